//! Status enums and role discriminators.

use serde::{Deserialize, Serialize};

/// Order production status.
///
/// The usual progression is `PENDING → BAKING → ROASTING → DELIVERING → COMPLETED`,
/// but the admin may set any value at any time; no transition is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Baking,
    Roasting,
    Delivering,
    Completed,
}

impl OrderStatus {
    /// All statuses in production order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Baking,
        Self::Roasting,
        Self::Delivering,
        Self::Completed,
    ];

    /// Whether the order still needs the kitchen's attention (shown on the dashboard).
    #[must_use]
    pub const fn is_new(self) -> bool {
        matches!(self, Self::Pending | Self::Baking)
    }

    /// Whether the order is in the oven or on its way.
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::Baking | Self::Roasting | Self::Delivering)
    }

    /// Vietnamese label shown to customers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Chờ xác nhận",
            Self::Baking => "Đang nhồi bột",
            Self::Roasting => "Đang nướng",
            Self::Delivering => "Đang giao",
            Self::Completed => "Hoàn thành",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Baking => write!(f, "BAKING"),
            Self::Roasting => write!(f, "ROASTING"),
            Self::Delivering => write!(f, "DELIVERING"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "BAKING" => Ok(Self::Baking),
            "ROASTING" => Ok(Self::Roasting),
            "DELIVERING" => Ok(Self::Delivering),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// The two roles sharing one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppRole {
    Customer,
    Admin,
}

/// How often the shop wants an automatic report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportFrequency {
    None,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
}
