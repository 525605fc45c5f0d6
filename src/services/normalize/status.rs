use serde_json::Value;

use super::aliases::booking as alias;
use super::{lookup, pick_string};
use crate::models::{BookingStatus, UiStage, CONTRACTED_LABEL};

#[derive(Debug, Clone, PartialEq)]
pub struct StatusResolution {
    pub status: BookingStatus,
    pub label: String,
    pub ui_stage: Option<UiStage>,
}

impl StatusResolution {
    fn of(status: BookingStatus) -> Self {
        Self {
            status,
            label: status.label().to_string(),
            ui_stage: None,
        }
    }
}

/// Resolves whatever status representation a raw booking carries.
///
/// A numeric code (number or all-digit string) anywhere in the status
/// aliases beats any textual status. Text falls through the pattern rules
/// in order; unmatched text, unknown codes and a missing status all land on
/// `Active`.
pub fn normalize_status(raw: &Value) -> StatusResolution {
    let mut resolution = match raw_code(raw) {
        Some(code) => {
            let mut r = StatusResolution::of(BookingStatus::from_code(code).unwrap_or(BookingStatus::Active));
            if code == 0 {
                r.ui_stage = Some(UiStage::WaitingPayment);
            }
            r
        }
        None => match raw_text(raw) {
            Some(text) => {
                let text = text.to_lowercase();
                let mut r = from_text(&text);
                r.ui_stage = stage_from_text(&text);
                r
            }
            None => StatusResolution::of(BookingStatus::Active),
        },
    };

    // Already-canonical records keep their label and hint.
    if let Some(label) = pick_string(raw, alias::STATUS_LABEL) {
        if label_fits(resolution.status, &label) {
            resolution.label = label;
        }
    }
    if resolution.ui_stage.is_none() {
        resolution.ui_stage = pick_string(raw, alias::UI_STAGE).and_then(|s| UiStage::parse(&s));
    }
    resolution
}

fn raw_code(raw: &Value) -> Option<u8> {
    alias::STATUS.iter().find_map(|key| match lookup(raw, key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .map(|c| u8::try_from(c).unwrap_or(u8::MAX)),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                Some(s.parse::<u8>().unwrap_or(u8::MAX))
            } else {
                None
            }
        }
        _ => None,
    })
}

fn raw_text(raw: &Value) -> Option<&str> {
    alias::STATUS
        .iter()
        .filter_map(|key| lookup(raw, key)?.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn from_text(text: &str) -> StatusResolution {
    let has = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

    if has(&["pending", "wait"]) {
        StatusResolution::of(BookingStatus::Pending)
    } else if text.contains("contract") {
        StatusResolution {
            label: CONTRACTED_LABEL.to_string(),
            ..StatusResolution::of(BookingStatus::Active)
        }
    } else if text.contains("check") && text.contains("in") {
        StatusResolution::of(BookingStatus::CheckedIn)
    } else if has(&["on-going", "ongoing", "progress"]) {
        StatusResolution::of(BookingStatus::Active)
    } else if has(&["complete", "finish"]) {
        StatusResolution::of(BookingStatus::Completed)
    } else if has(&["deny", "denied", "reject", "cancel"]) {
        StatusResolution::of(BookingStatus::Cancelled)
    } else {
        StatusResolution::of(BookingStatus::Active)
    }
}

fn stage_from_text(text: &str) -> Option<UiStage> {
    if text.contains("pending") || text.contains("wait") {
        Some(UiStage::WaitingPayment)
    } else if text.contains("check") && text.contains("in") && text.contains("pay") {
        Some(UiStage::CheckinPayment)
    } else {
        None
    }
}

fn label_fits(status: BookingStatus, label: &str) -> bool {
    label == status.label() || (status == BookingStatus::Active && label == CONTRACTED_LABEL)
}
