//! Device type templates and container slot definitions.

use crate::models::{Colour, CustomFields, DeviceFace, SlotPosition};
use crate::units::{to_human, to_internal};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum device height in U.
pub const MAX_DEVICE_HEIGHT_U: f64 = 100.0;

/// Slot width of a half-width device.
pub const HALF_WIDTH: u8 = 1;

/// Slot width of a full-width device.
pub const FULL_WIDTH: u8 = 2;

/// Functional category of a device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceCategory {
    /// Compute servers
    Server,
    /// Switches, routers, firewalls
    Network,
    /// Patch panels
    PatchPanel,
    /// PDUs and UPS units
    Power,
    /// Storage arrays and disk shelves
    Storage,
    /// KVM switches and consoles
    Kvm,
    /// Audio/video equipment
    AvMedia,
    /// Fans and cooling
    Cooling,
    /// Shelves and trays
    Shelf,
    /// Blanking panels
    Blank,
    /// Cable management
    CableManagement,
    /// Anything else
    #[default]
    Other,
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Server => "server",
            Self::Network => "network",
            Self::PatchPanel => "patch-panel",
            Self::Power => "power",
            Self::Storage => "storage",
            Self::Kvm => "kvm",
            Self::AvMedia => "av-media",
            Self::Cooling => "cooling",
            Self::Shelf => "shelf",
            Self::Blank => "blank",
            Self::CableManagement => "cable-management",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A named bay inside a container device that can hold child devices.
///
/// # Validation
///
/// - id must be non-empty and unique within its device type
/// - `width_fraction` must be in (0, 1]
/// - `height_units` must be positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Identifier unique within the container type (e.g. "bay-1")
    pub id: String,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Horizontal share of the container width (0.5 = half)
    pub width_fraction: f64,
    /// Vertical capacity in U
    pub height_units: f64,
    /// Accepted child categories (empty accepts everything)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepts: Vec<DeviceCategory>,
}

impl Slot {
    /// Creates a slot accepting any category.
    pub fn new(id: impl Into<String>, width_fraction: f64, height_units: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            width_fraction,
            height_units,
            accepts: Vec::new(),
        }
    }

    /// Restricts the slot to the given categories.
    #[must_use]
    pub fn accepting(mut self, categories: impl IntoIterator<Item = DeviceCategory>) -> Self {
        self.accepts = categories.into_iter().collect();
        self
    }

    /// Returns true if a device of `category` may be placed in this slot.
    #[must_use]
    pub fn accepts_category(&self, category: DeviceCategory) -> bool {
        self.accepts.is_empty() || self.accepts.contains(&category)
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            anyhow::bail!("Slot ID cannot be empty");
        }
        if !(self.width_fraction > 0.0 && self.width_fraction <= 1.0) {
            anyhow::bail!(
                "Slot '{}' width fraction must be in (0, 1], got {}",
                self.id,
                self.width_fraction
            );
        }
        if self.height_units <= 0.0 {
            anyhow::bail!(
                "Slot '{}' height must be positive, got {}",
                self.id,
                self.height_units
            );
        }
        Ok(())
    }
}

/// Template describing a kind of rack device.
///
/// # Validation
///
/// - slug must be kebab-case and unique within a layout's library
/// - `u_height` must be positive, at most 100U, and a multiple of 1/6 U
/// - `slot_width` must be 1 (half) or 2 (full)
/// - slot ids must be unique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceType {
    /// Unique key (e.g. "dell-r740")
    pub slug: String,
    /// Model name shown on the block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Manufacturer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Height in U (fractions of 1/6 allowed)
    pub u_height: f64,
    /// Whether the device spans both rack faces
    #[serde(default)]
    pub is_full_depth: bool,
    /// Horizontal width: 1 = half, 2 = full
    #[serde(default = "default_slot_width")]
    pub slot_width: u8,
    /// Block colour
    #[serde(default)]
    pub colour: Colour,
    /// Functional category
    #[serde(default)]
    pub category: DeviceCategory,
    /// Child bays; non-empty makes this type a container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<Slot>,
    /// User-defined fields
    #[serde(default, skip_serializing_if = "CustomFields::is_empty")]
    pub custom_fields: CustomFields,
}

const fn default_slot_width() -> u8 {
    FULL_WIDTH
}

impl DeviceType {
    /// Creates a full-width, half-depth device type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rackplan::models::DeviceType;
    ///
    /// let switch = DeviceType::new("core-switch", 1.0).unwrap();
    /// assert!(!switch.is_half_width());
    /// assert!(DeviceType::new("Bad Slug", 1.0).is_err());
    /// ```
    pub fn new(slug: impl Into<String>, u_height: f64) -> Result<Self> {
        let device_type = Self {
            slug: slug.into(),
            model: None,
            manufacturer: None,
            u_height,
            is_full_depth: false,
            slot_width: FULL_WIDTH,
            colour: Colour::default(),
            category: DeviceCategory::default(),
            slots: Vec::new(),
            custom_fields: CustomFields::new(),
        };
        device_type.validate()?;
        Ok(device_type)
    }

    /// Sets the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the manufacturer.
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Marks the device as full depth.
    #[must_use]
    pub const fn full_depth(mut self) -> Self {
        self.is_full_depth = true;
        self
    }

    /// Marks the device as half width.
    #[must_use]
    pub const fn half_width(mut self) -> Self {
        self.slot_width = HALF_WIDTH;
        self
    }

    /// Sets the category.
    #[must_use]
    pub const fn with_category(mut self, category: DeviceCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the block colour.
    #[must_use]
    pub const fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }

    /// Adds a child slot, turning this type into a container.
    #[must_use]
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Height in internal grid units.
    #[must_use]
    pub fn height_internal(&self) -> i32 {
        to_internal(self.u_height)
    }

    /// Returns true if this type occupies half the rack width.
    #[must_use]
    pub const fn is_half_width(&self) -> bool {
        self.slot_width == HALF_WIDTH
    }

    /// Face a placement of this type actually takes.
    ///
    /// Full-depth types always occupy both faces.
    #[must_use]
    pub const fn pinned_face(&self, requested: DeviceFace) -> DeviceFace {
        if self.is_full_depth {
            DeviceFace::Both
        } else {
            requested
        }
    }

    /// Horizontal slot a placement of this type actually takes.
    ///
    /// Full-width types are always `Full`; half-width ones asked for `Full`
    /// go on the left.
    #[must_use]
    pub const fn normalized_slot(&self, requested: SlotPosition) -> SlotPosition {
        match (self.is_half_width(), requested) {
            (false, _) => SlotPosition::Full,
            (true, SlotPosition::Full) => SlotPosition::Left,
            (true, side) => side,
        }
    }

    /// Share of the rack width this type occupies (0.5 or 1.0).
    #[must_use]
    pub fn width_fraction(&self) -> f64 {
        f64::from(self.slot_width) / f64::from(FULL_WIDTH)
    }

    /// Returns true if this type exposes child slots.
    #[must_use]
    pub fn is_container(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Looks up a child slot by id.
    #[must_use]
    pub fn get_slot(&self, slot_id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    /// Name used in messages: model if set, otherwise the slug.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.model.as_deref().unwrap_or(&self.slug)
    }

    /// Validates the device type fields.
    pub fn validate(&self) -> Result<()> {
        validate_slug(&self.slug)?;

        if self.u_height <= 0.0 || self.u_height > MAX_DEVICE_HEIGHT_U {
            anyhow::bail!(
                "Device type '{}' height must be in (0, {MAX_DEVICE_HEIGHT_U}]U, got {}",
                self.slug,
                self.u_height
            );
        }

        if (to_human(self.height_internal()) - self.u_height).abs() > 1e-9 {
            anyhow::bail!(
                "Device type '{}' height {}U is not a multiple of 1/6 U",
                self.slug,
                self.u_height
            );
        }

        if self.slot_width != HALF_WIDTH && self.slot_width != FULL_WIDTH {
            anyhow::bail!(
                "Device type '{}' slot width must be 1 (half) or 2 (full), got {}",
                self.slug,
                self.slot_width
            );
        }

        for (idx, slot) in self.slots.iter().enumerate() {
            slot.validate()?;
            if self.slots[..idx].iter().any(|s| s.id == slot.id) {
                anyhow::bail!(
                    "Device type '{}' has duplicate slot ID '{}'",
                    self.slug,
                    slot.id
                );
            }
        }

        Ok(())
    }
}

/// Validates slug format (kebab-case).
fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        anyhow::bail!("Device type slug cannot be empty");
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        anyhow::bail!("Device type slug '{slug}' must be kebab-case (lowercase, hyphens, and digits only)");
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        anyhow::bail!("Device type slug '{slug}' cannot start or end with a hyphen");
    }

    Ok(())
}

/// Finds a device type by slug in a library.
#[must_use]
pub fn find_device_type<'a>(library: &'a [DeviceType], slug: &str) -> Option<&'a DeviceType> {
    library.iter().find(|dt| dt.slug == slug)
}
