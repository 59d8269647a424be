//! Recorded operations on racks and rack groups.

use super::LayoutStore;
use crate::config::Config;
use crate::history::{Command, CommandAction};
use crate::models::rack::{validate_rack_properties, MIN_GROUP_SIZE};
use crate::models::{LayoutPreset, Rack, RackGroup, RackProperties};
use crate::services::errors::{MutationError, MutationResult};
use crate::units::{format_u, occupied_range, rack_max_position};
use tracing::debug;

impl LayoutStore {
    /// Appends an empty rack. Returns its id.
    pub fn add_rack(&mut self, name: &str, height: u32, width: u32) -> MutationResult<String> {
        let rack = Rack::new(name.trim(), height, width)?;
        let rack_id = rack.id.clone();
        let index = self.layout.racks.len();

        debug!(rack_id = %rack_id, height, width, "add rack");
        self.record(Command::new(
            format!("Add rack {}", rack.name),
            CommandAction::AddRack { index, rack },
        ));
        Ok(rack_id)
    }

    /// Appends an empty rack sized from the configured defaults. Returns its id.
    pub fn add_default_rack(&mut self, config: &Config, name: &str) -> MutationResult<String> {
        self.add_rack(name, config.defaults.rack_height, config.defaults.rack_width)
    }

    /// Changes a rack's name, height or width.
    ///
    /// Racks in a bayed group keep their height. A rack cannot shrink below
    /// the top of its highest device.
    pub fn update_rack(&mut self, rack_id: &str, properties: RackProperties) -> MutationResult<()> {
        validate_rack_properties(&properties)?;
        let rack = self.rack(rack_id)?;
        let before = rack.properties();
        if before == properties {
            return Ok(());
        }

        if properties.height != before.height {
            if let Some(group) = self.layout.group_for_rack(rack_id).filter(|g| g.is_bayed()) {
                return Err(MutationError::BayedHeightLocked {
                    rack: rack.name.clone(),
                    group: group.name.clone(),
                });
            }

            let limit = rack_max_position(properties.height);
            for device in rack.devices.iter().filter(|d| !d.is_container_child()) {
                let Some(device_type) = self.layout.get_device_type(&device.device_type) else {
                    continue;
                };
                if occupied_range(device.position, device_type.u_height).1 > limit {
                    return Err(MutationError::OutOfBounds {
                        device: self.label(device),
                        position: format_u(device.position),
                        limit: format!("{}U rack '{}'", properties.height, properties.name),
                    });
                }
            }
        }

        debug!(rack_id, height = properties.height, width = properties.width, "update rack");
        self.record(Command::new(
            format!("Edit rack {}", before.name),
            CommandAction::UpdateRack {
                rack_id: rack_id.to_string(),
                before,
                after: properties,
            },
        ));
        Ok(())
    }

    /// Deletes a rack with its devices and drops it from its group.
    ///
    /// A group left with fewer than two racks is deleted as well.
    pub fn delete_rack(&mut self, rack_id: &str) -> MutationResult<()> {
        let index = self
            .layout
            .rack_index(rack_id)
            .ok_or_else(|| MutationError::UnknownRack(rack_id.to_string()))?;
        let rack = self.layout.racks[index].clone();
        let description = format!("Delete rack {}", rack.name);

        let mut commands = Vec::new();
        if let Some(group) = self.layout.group_for_rack(rack_id) {
            commands.push(self.membership_removal(group, rack_id));
        }
        commands.push(Command::new(
            description.clone(),
            CommandAction::RemoveRack { index, rack },
        ));

        debug!(rack_id, "delete rack");
        let command = if commands.len() == 1 {
            commands.remove(0)
        } else {
            Command::batch(description, commands)
        };
        self.record(command);
        Ok(())
    }

    /// Groups at least two ungrouped racks. Returns the group id.
    ///
    /// Members of a bayed group must share one height.
    pub fn create_rack_group(
        &mut self,
        name: &str,
        preset: LayoutPreset,
        rack_ids: Vec<String>,
    ) -> MutationResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MutationError::Invalid("Rack group name cannot be empty".into()));
        }
        if rack_ids.len() < MIN_GROUP_SIZE {
            return Err(MutationError::GroupTooSmall {
                count: rack_ids.len(),
            });
        }

        let mut racks: Vec<&Rack> = Vec::with_capacity(rack_ids.len());
        for rack_id in &rack_ids {
            let rack = self.rack(rack_id)?;
            if racks.iter().any(|r| r.id == rack.id) {
                return Err(MutationError::Invalid(format!(
                    "Rack '{}' is listed twice",
                    rack.name
                )));
            }
            if let Some(existing) = self.layout.group_for_rack(rack_id) {
                return Err(MutationError::RackAlreadyGrouped {
                    rack: rack.name.clone(),
                    group: existing.name.clone(),
                });
            }
            racks.push(rack);
        }

        if preset == LayoutPreset::Bayed {
            let group_height = racks[0].height;
            if let Some(odd) = racks.iter().find(|r| r.height != group_height) {
                return Err(MutationError::GroupHeightMismatch {
                    group: name.to_string(),
                    group_height,
                    rack_height: odd.height,
                });
            }
        }

        let group = RackGroup::new(name, preset, rack_ids);
        let group_id = group.id.clone();
        let index = self.layout.rack_groups.len();
        debug!(group_id = %group_id, members = group.rack_ids.len(), "create rack group");
        self.record(Command::new(
            format!("Create group {name}"),
            CommandAction::AddGroup { index, group },
        ));
        Ok(group_id)
    }

    /// Renames a rack group.
    pub fn rename_rack_group(&mut self, group_id: &str, name: &str) -> MutationResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MutationError::Invalid("Rack group name cannot be empty".into()));
        }
        let group = self.group(group_id)?;
        if group.name == name {
            return Ok(());
        }

        let from = group.name.clone();
        debug!(group_id, name, "rename rack group");
        self.record(Command::new(
            format!("Rename group {from} to {name}"),
            CommandAction::RenameGroup {
                group_id: group_id.to_string(),
                from,
                to: name.to_string(),
            },
        ));
        Ok(())
    }

    /// Dissolves a rack group. Its racks are kept.
    pub fn delete_rack_group(&mut self, group_id: &str) -> MutationResult<()> {
        let index = self
            .layout
            .group_index(group_id)
            .ok_or_else(|| MutationError::UnknownGroup(group_id.to_string()))?;
        let group = self.layout.rack_groups[index].clone();

        debug!(group_id, "delete rack group");
        self.record(Command::new(
            format!("Delete group {}", group.name),
            CommandAction::RemoveGroup { index, group },
        ));
        Ok(())
    }

    /// Adds an ungrouped rack to a group.
    ///
    /// A bayed group only takes racks of its own height.
    pub fn add_rack_to_group(&mut self, group_id: &str, rack_id: &str) -> MutationResult<()> {
        let group = self.group(group_id)?;
        let rack = self.rack(rack_id)?;
        if let Some(existing) = self.layout.group_for_rack(rack_id) {
            return Err(MutationError::RackAlreadyGrouped {
                rack: rack.name.clone(),
                group: existing.name.clone(),
            });
        }

        if group.is_bayed() {
            let group_height = group
                .rack_ids
                .iter()
                .find_map(|id| self.layout.get_rack(id))
                .map(|member| member.height);
            if let Some(group_height) = group_height.filter(|&h| h != rack.height) {
                return Err(MutationError::GroupHeightMismatch {
                    group: group.name.clone(),
                    group_height,
                    rack_height: rack.height,
                });
            }
        }

        let from = group.rack_ids.clone();
        let mut to = from.clone();
        to.push(rack_id.to_string());
        let description = format!("Add {} to group {}", rack.name, group.name);

        debug!(group_id, rack_id, "add rack to group");
        self.record(Command::new(
            description,
            CommandAction::SetGroupMembers {
                group_id: group_id.to_string(),
                from,
                to,
            },
        ));
        Ok(())
    }

    /// Removes a rack from a group.
    ///
    /// If fewer than two racks would remain, the group is deleted instead.
    pub fn remove_rack_from_group(&mut self, group_id: &str, rack_id: &str) -> MutationResult<()> {
        let group = self.group(group_id)?;
        if !group.contains(rack_id) {
            let rack = self
                .layout
                .get_rack(rack_id)
                .map_or_else(|| rack_id.to_string(), |r| r.name.clone());
            return Err(MutationError::NotInGroup {
                rack,
                group: group.name.clone(),
            });
        }

        debug!(group_id, rack_id, "remove rack from group");
        let command = self.membership_removal(group, rack_id);
        self.record(command);
        Ok(())
    }

    fn group(&self, group_id: &str) -> MutationResult<&RackGroup> {
        self.layout
            .get_group(group_id)
            .ok_or_else(|| MutationError::UnknownGroup(group_id.to_string()))
    }

    /// Command taking `rack_id` out of `group`, dissolving it when too small.
    fn membership_removal(&self, group: &RackGroup, rack_id: &str) -> Command {
        let remaining: Vec<String> = group
            .rack_ids
            .iter()
            .filter(|id| id.as_str() != rack_id)
            .cloned()
            .collect();

        if remaining.len() < MIN_GROUP_SIZE {
            let index = self.layout.group_index(&group.id).unwrap_or_default();
            return Command::new(
                format!("Delete group {}", group.name),
                CommandAction::RemoveGroup {
                    index,
                    group: group.clone(),
                },
            );
        }

        Command::new(
            format!("Remove rack from group {}", group.name),
            CommandAction::SetGroupMembers {
                group_id: group.id.clone(),
                from: group.rack_ids.clone(),
                to: remaining,
            },
        )
    }
}
