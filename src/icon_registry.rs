//! Closed registry of symbolic icon names.
//!
//! Records never hold a glyph, only a symbolic key such as `"PenTool"`. The
//! host resolves that key through [`Icon::resolve`], which falls back to
//! [`Icon::DEFAULT`] for names outside the registry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    PenTool,
    Truck,
    Palette,
    Settings,
    ShoppingBag,
    Coffee,
    Store,
    Zap,
    Hammer,
    CheckCircle2,
    Building2,
    Users,
    Star,
    Box,
    Scissors,
    Monitor,
}

impl Icon {
    /// Registry order, which is also the order of icon dropdowns.
    pub const ALL: [Icon; 16] = [
        Icon::PenTool,
        Icon::Truck,
        Icon::Palette,
        Icon::Settings,
        Icon::ShoppingBag,
        Icon::Coffee,
        Icon::Store,
        Icon::Zap,
        Icon::Hammer,
        Icon::CheckCircle2,
        Icon::Building2,
        Icon::Users,
        Icon::Star,
        Icon::Box,
        Icon::Scissors,
        Icon::Monitor,
    ];

    pub const DEFAULT: Icon = Icon::Store;

    pub fn name(self) -> &'static str {
        match self {
            Icon::PenTool => "PenTool",
            Icon::Truck => "Truck",
            Icon::Palette => "Palette",
            Icon::Settings => "Settings",
            Icon::ShoppingBag => "ShoppingBag",
            Icon::Coffee => "Coffee",
            Icon::Store => "Store",
            Icon::Zap => "Zap",
            Icon::Hammer => "Hammer",
            Icon::CheckCircle2 => "CheckCircle2",
            Icon::Building2 => "Building2",
            Icon::Users => "Users",
            Icon::Star => "Star",
            Icon::Box => "Box",
            Icon::Scissors => "Scissors",
            Icon::Monitor => "Monitor",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Icon> {
        Icon::ALL.iter().copied().find(|icon| icon.name() == name)
    }

    pub fn resolve(name: &str) -> Icon {
        Icon::from_name(name).unwrap_or(Icon::DEFAULT)
    }
}

/// Names offered by icon selectors in the admin forms.
pub fn available_icons() -> Vec<&'static str> {
    Icon::ALL.iter().map(|icon| icon.name()).collect()
}
