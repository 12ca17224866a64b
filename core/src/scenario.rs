//! Scam scenario keys and normalization of free-form scenario labels.
//!
//! Labels come from route parameters, quick-pick buttons, and the analysis
//! backend's `scenario` enum, so the same situation arrives in many spellings.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    MoneyMoved,
    AskedToPay,
    OtpPassword,
    Courier,
    Investment,
    Job,
    Romance,
    Impersonation,
    Other,
}

impl Scenario {
    pub const ALL: [Scenario; 9] = [
        Scenario::MoneyMoved,
        Scenario::AskedToPay,
        Scenario::OtpPassword,
        Scenario::Courier,
        Scenario::Investment,
        Scenario::Job,
        Scenario::Romance,
        Scenario::Impersonation,
        Scenario::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Scenario::MoneyMoved => "money_moved",
            Scenario::AskedToPay => "asked_to_pay",
            Scenario::OtpPassword => "otp_password",
            Scenario::Courier => "courier",
            Scenario::Investment => "investment",
            Scenario::Job => "job",
            Scenario::Romance => "romance",
            Scenario::Impersonation => "impersonation",
            Scenario::Other => "other",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    /// Map any label to a scenario. Unknown labels become `Other`.
    pub fn normalize(raw: &str) -> Self {
        let cleaned = raw
            .to_lowercase()
            .replace("%20", " ")
            .replace(['_', '-'], " ");
        let label = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

        if let Some(scenario) = synonym(&label) {
            return scenario;
        }
        Self::from_key(&label.replace(' ', "_")).unwrap_or(Scenario::Other)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn synonym(label: &str) -> Option<Scenario> {
    const TABLE: &[(Scenario, &[&str])] = &[
        (
            Scenario::MoneyMoved,
            &[
                "money moved",
                "money already moved",
                "bank transfer",
                "funds moved",
                "unauthorised transaction",
            ],
        ),
        (
            Scenario::AskedToPay,
            &["asked to pay", "asked to pay money", "payment request", "pay now", "marketplace"],
        ),
        (
            Scenario::OtpPassword,
            &[
                "otp",
                "otp password",
                "otp / password",
                "password",
                "tac",
                "otp tac",
                "otp tac password",
                "otp malware",
            ],
        ),
        (
            Scenario::Courier,
            &["courier", "delivery", "parcel", "poslaju", "j&t", "jnt", "dhl", "courier parcel"],
        ),
        (
            Scenario::Investment,
            &["investment", "crypto", "forex", "high return", "trading"],
        ),
        (
            Scenario::Job,
            &["job", "recruitment", "interview", "work offer", "job scam"],
        ),
        (Scenario::Romance, &["romance", "love", "tinder", "dating"]),
        (
            Scenario::Impersonation,
            &["impersonation", "scammer pretending", "police", "bank officer", "gov officer"],
        ),
        (Scenario::Other, &["other", "see all", "unknown"]),
    ];

    TABLE
        .iter()
        .find(|(_, labels)| labels.iter().any(|l| *l == label))
        .map(|(scenario, _)| *scenario)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_map_to_keys() {
        assert_eq!(Scenario::normalize("Money already moved"), Scenario::MoneyMoved);
        assert_eq!(Scenario::normalize("  PosLaju "), Scenario::Courier);
        assert_eq!(Scenario::normalize("OTP / Password"), Scenario::OtpPassword);
        assert_eq!(Scenario::normalize("bank-officer"), Scenario::Impersonation);
    }

    #[test]
    fn url_encoded_and_separators_are_cleaned() {
        assert_eq!(Scenario::normalize("asked%20to%20pay"), Scenario::AskedToPay);
        assert_eq!(Scenario::normalize("work__offer"), Scenario::Job);
    }

    #[test]
    fn canonical_keys_round_trip() {
        for scenario in Scenario::ALL {
            assert_eq!(Scenario::normalize(scenario.key()), scenario);
        }
    }

    #[test]
    fn backend_enum_labels_are_understood() {
        assert_eq!(Scenario::normalize("BANK_TRANSFER"), Scenario::MoneyMoved);
        assert_eq!(Scenario::normalize("COURIER_PARCEL"), Scenario::Courier);
        assert_eq!(Scenario::normalize("OTP_MALWARE"), Scenario::OtpPassword);
        assert_eq!(Scenario::normalize("ROMANCE"), Scenario::Romance);
    }

    #[test]
    fn unknown_is_other() {
        assert_eq!(Scenario::normalize("lottery winnings"), Scenario::Other);
        assert_eq!(Scenario::normalize(""), Scenario::Other);
    }
}
