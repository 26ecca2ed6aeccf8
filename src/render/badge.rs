use crate::api::PrState;

/// Tag color of a pull-request status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Purple,
    Green,
    Red,
    /// Any state outside merged/open/closed.
    Gray,
}

impl BadgeColor {
    pub fn css_class(self) -> &'static str {
        match self {
            BadgeColor::Purple => "bg-purple-500",
            BadgeColor::Green => "bg-green-500",
            BadgeColor::Red => "bg-red-500",
            BadgeColor::Gray => "bg-zinc-500",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub color: BadgeColor,
}

/// Map a pull-request state to its badge.
pub fn status_badge(state: &PrState) -> StatusBadge {
    let color = match state {
        PrState::Merged => BadgeColor::Purple,
        PrState::Open => BadgeColor::Green,
        PrState::Closed => BadgeColor::Red,
        PrState::Other(_) => BadgeColor::Gray,
    };

    let label = match capitalize(state.as_str()) {
        label if label.is_empty() => "Unknown".to_string(),
        label => label,
    };

    StatusBadge { label, color }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
