use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Canonical booking lifecycle. Raw backend codes/strings never get past the normalizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Pending,
    Active,
    WaitingCheckIn,
    CheckedIn,
    CheckoutPending,
    Completed,
    CancelledPendingRefund,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 8] = [
        BookingStatus::Pending,
        BookingStatus::Active,
        BookingStatus::WaitingCheckIn,
        BookingStatus::CheckedIn,
        BookingStatus::CheckoutPending,
        BookingStatus::Completed,
        BookingStatus::CancelledPendingRefund,
        BookingStatus::Cancelled,
    ];

    /// The backend's numeric code for this state.
    pub fn code(&self) -> u8 {
        match self {
            BookingStatus::Pending => 0,
            BookingStatus::Active => 1,
            BookingStatus::WaitingCheckIn => 2,
            BookingStatus::CheckedIn => 3,
            BookingStatus::CheckoutPending => 4,
            BookingStatus::Completed => 5,
            BookingStatus::CancelledPendingRefund => 6,
            BookingStatus::Cancelled => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Active => "Booked",
            BookingStatus::WaitingCheckIn => "Waiting Check-in",
            BookingStatus::CheckedIn => "Checked-in",
            BookingStatus::CheckoutPending => "Checkout Pending",
            BookingStatus::Completed => "Completed",
            BookingStatus::CancelledPendingRefund => "Cancelled - Refund Pending",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

/// Label for an `Active` booking whose contract has been signed.
pub const CONTRACTED_LABEL: &str = "Contracted";

/// UI emphasis hint. Never feeds back into `BookingStatus`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UiStage {
    WaitingPayment,
    CheckinPayment,
}

impl UiStage {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "waiting-payment" => Some(UiStage::WaitingPayment),
            "checkin-payment" => Some(UiStage::CheckinPayment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDocuments {
    pub cccd_front_url: Option<String>,
    pub cccd_back_url: Option<String>,
    pub gplx_front_url: Option<String>,
    pub gplx_back_url: Option<String>,
    pub id_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Option<String>,
    pub vehicle_title: Option<String>,
    pub car_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub user_name: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub status: BookingStatus,
    pub status_code: u8,
    pub status_label: String,
    pub ui_stage: Option<UiStage>,
    pub pickup_at: Option<NaiveDateTime>,
    pub return_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub station_id: Option<String>,
    pub vehicle_image_url: Option<String>,
    #[serde(flatten)]
    pub documents: IdentityDocuments,
}
