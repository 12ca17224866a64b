//! Display labels for the analysis backend's verdict and risk fields.
//!
//! The app never shows accusatory wording such as "SCAM" or "FRAUD" as a
//! verdict; those labels are softened into risk-indicator phrasing.

pub const HIGH_RISK: &str = "HIGH RISK INDICATORS";
pub const SUSPICIOUS: &str = "SUSPICIOUS INDICATORS";
pub const UNCLEAR: &str = "UNCLEAR • NEEDS VERIFICATION";

/// Label to show for a verdict, given the accompanying risk level.
pub fn display_verdict(verdict: &str, risk: &str) -> String {
    let raw = verdict.trim();
    let upper = raw.to_uppercase();

    if upper.contains("SCAM") || upper.contains("FRAUD") {
        return match risk.trim().to_uppercase().as_str() {
            "HIGH" => HIGH_RISK,
            "MEDIUM" => SUSPICIOUS,
            _ => UNCLEAR,
        }
        .to_string();
    }
    if upper.contains("HIGH_RISK") {
        return HIGH_RISK.to_string();
    }
    if upper.contains("SUSPICIOUS") {
        return SUSPICIOUS.to_string();
    }
    if upper.contains("UNCLEAR") || raw.is_empty() {
        return UNCLEAR.to_string();
    }
    raw.replace('_', " ")
}

/// `HIGH`, `MEDIUM` or `LOW`; anything unrecognized shows as `LOW`.
pub fn display_risk(risk: &str) -> &'static str {
    match risk.trim().to_uppercase().as_str() {
        "HIGH" => "HIGH",
        "MEDIUM" => "MEDIUM",
        _ => "LOW",
    }
}
