//! Entities owned by (or referenced from) the allocation and billing ledgers.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

pub type RoomId = i32;
pub type StudentId = i32;
pub type FeeId = i32;

/// Raised when a stored string does not map back onto one of the domain enums.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// Derived room state: a room is occupied exactly when it has a non-zero
/// capacity and the occupant count has reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
}

impl RoomStatus {
    #[must_use]
    pub fn derive(capacity: i32, current_occupants: i32) -> Self {
        if capacity > 0 && current_occupants >= capacity {
            Self::Occupied
        } else {
            Self::Available
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
        }
    }
}

impl FromStr for RoomStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            other => Err(UnknownValue {
                kind: "room status",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub room_id: RoomId,
    pub room_no: String,
    pub room_type: String,
    pub floor: i32,
    pub capacity: i32,
    pub current_occupants: i32,
    pub monthly_rent: f64,
    pub status: RoomStatus,
}

/// The slice of the student directory this core reads. Registration and
/// profile CRUD live elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub student_id: StudentId,
    pub name: String,
    pub admission_date: NaiveDate,
    pub admission_fee_paid: bool,
    pub room_id: Option<RoomId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FeeStatus {
    Pending,
    Paid,
}

impl FeeStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
        }
    }
}

impl FromStr for FeeStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            other => Err(UnknownValue {
                kind: "fee status",
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMode {
    Cash,
    Online,
}

impl PaymentMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Online => "ONLINE",
        }
    }
}

impl FromStr for PaymentMode {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(Self::Cash),
            "ONLINE" => Ok(Self::Online),
            other => Err(UnknownValue {
                kind: "payment mode",
                value: other.to_owned(),
            }),
        }
    }
}

/// Calendar month a fee record was generated for. Attached to every record so
/// a scheduler restart cannot bill the same student twice in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BillingCycle {
    pub year: i32,
    pub month: u32,
}

impl BillingCycle {
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingCycle {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownValue {
            kind: "billing cycle",
            value: s.to_owned(),
        };
        let (year, month) = s.split_once('-').ok_or_else(unknown)?;
        let year = year.parse().map_err(|_| unknown())?;
        let month: u32 = month.parse().map_err(|_| unknown())?;
        if !(1..=12).contains(&month) {
            return Err(unknown());
        }
        Ok(Self { year, month })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeRecord {
    pub fee_id: FeeId,
    pub student_id: StudentId,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: FeeStatus,
    pub payment_mode: Option<PaymentMode>,
    pub cycle: BillingCycle,
}

/// Fee record as handed to the store for insertion; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFee {
    pub student_id: StudentId,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub cycle: BillingCycle,
}

/// One line of the denormalized fee listing. Left-join semantics: students
/// without a room or without a fee record still appear, with those fields
/// unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeTableRow {
    pub student_id: StudentId,
    pub student_name: String,
    pub admission_date: NaiveDate,
    pub room_no: Option<String>,
    pub fee_amount: Option<f64>,
    pub fee_status: Option<FeeStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "BREAKFAST",
            Self::Lunch => "LUNCH",
            Self::Dinner => "DINNER",
        }
    }
}

impl FromStr for MealType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BREAKFAST" => Ok(Self::Breakfast),
            "LUNCH" => Ok(Self::Lunch),
            "DINNER" => Ok(Self::Dinner),
            other => Err(UnknownValue {
                kind: "meal type",
                value: other.to_owned(),
            }),
        }
    }
}

/// Tri-state meal response. `Unset` means the student has not answered yet and
/// is a first-class case, not a missing boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipResponse {
    #[default]
    Unset,
    Skipped,
    Attending,
}

impl SkipResponse {
    /// Mapping onto the nullable boolean column the relational schema uses.
    #[must_use]
    pub const fn as_flag(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::Skipped => Some(true),
            Self::Attending => Some(false),
        }
    }

    #[must_use]
    pub const fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            None => Self::Unset,
            Some(true) => Self::Skipped,
            Some(false) => Self::Attending,
        }
    }
}
