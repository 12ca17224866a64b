//! Locally synthesized replies used when no backend candidate succeeds.
//!
//! These never fail and never touch the network. Both carry the same list of
//! Malaysian emergency and support lines.

use crate::types::{ChatPayload, ReportPayload};

/// A support line shown in every fallback reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmergencyContact {
    pub name: &'static str,
    pub number: &'static str,
    pub notes: &'static str,
}

pub const EMERGENCY_CONTACTS: &[EmergencyContact] = &[
    EmergencyContact {
        name: "MERS 999",
        number: "999",
        notes: "Police / Ambulance / Fire (112 from mobile)",
    },
    EmergencyContact {
        name: "Talian Kasih 15999",
        number: "15999",
        notes: "24/7, KPWKM. WhatsApp 019-2615999",
    },
    EmergencyContact {
        name: "Befrienders Kuala Lumpur",
        number: "+60 3-7627 2929",
        notes: "24/7 emotional support",
    },
    EmergencyContact {
        name: "Women's Aid Organisation (WAO)",
        number: "+60 3-3000 8858",
        notes: "WhatsApp TINA +60 18-988 8058",
    },
    EmergencyContact {
        name: "Cyber999 (MyCERT)",
        number: "1-300-88-2999",
        notes: "Online harms and cyberbullying",
    },
    EmergencyContact {
        name: "NSRC",
        number: "997",
        notes: "Scams where money has already moved",
    },
];

const NOT_PROVIDED: &str = "Not provided";

/// Formatted contact block, one line per contact.
pub fn contacts_block() -> String {
    EMERGENCY_CONTACTS
        .iter()
        .map(|c| format!("- {}: {} ({})", c.name, c.number, c.notes))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Offline incident report skeleton echoing what the user typed.
pub fn report(payload: &ReportPayload) -> String {
    format!(
        "INCIDENT REPORT (offline draft)\n\
         \n\
         Category: {category}\n\
         Date: {date}\n\
         Time: {time}\n\
         Location: {location}\n\
         \n\
         What happened:\n\
         {description}\n\
         \n\
         This draft was prepared on your device because the report service could not be reached. \
         Review it, add any names, times and evidence you are comfortable sharing, and keep a copy in your Vault.\n\
         \n\
         If anyone is in immediate danger, call 999 now.\n\
         \n\
         Emergency and support contacts (Malaysia):\n\
         {contacts}",
        category = or_not_provided(&payload.category),
        date = or_not_provided(&payload.date_iso),
        time = or_not_provided(&payload.time_iso),
        location = or_not_provided(&payload.location_text),
        description = or_not_provided(&payload.description),
        contacts = contacts_block(),
    )
}

/// Offline supportive reply for the assistant chat.
///
/// The conversation is not inspected; the reply is the same for every input.
pub fn chat(_payload: &ChatPayload) -> String {
    format!(
        "I'm here to support you, even though I can't reach the assistant service right now. \
         Tell me what happened and what you need right now. \
         If you're in immediate danger, call 999 (Malaysia) or your local emergency number.\n\
         24/7 help: Talian Kasih 15999 (WhatsApp 019-2615999).\n\
         \n\
         Emergency and support contacts (Malaysia):\n\
         {}",
        contacts_block()
    )
}

fn or_not_provided(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_PROVIDED
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[test]
    fn report_echoes_description_and_contacts() {
        let text = report(&ReportPayload::new("Other", "Someone threatened me"));
        assert!(text.contains("Category: Other"));
        assert!(text.contains("Someone threatened me"));
        assert!(text.contains("999"));
        assert!(text.contains("Talian Kasih 15999"));
    }

    #[test]
    fn blank_fields_are_marked_not_provided() {
        let text = report(&ReportPayload::default());
        assert!(text.contains("Location: Not provided"));
        assert!(text.contains("Date: Not provided"));
    }

    #[test]
    fn chat_fallback_is_fixed() {
        let a = chat(&ChatPayload::default());
        let b = chat(&ChatPayload::new(vec![ChatMessage::user("help")]));
        assert_eq!(a, b);
        assert!(a.contains("Talian Kasih 15999"));
        assert!(a.contains("999"));
    }

    #[test]
    fn contacts_block_lists_every_contact() {
        assert_eq!(contacts_block().lines().count(), EMERGENCY_CONTACTS.len());
    }
}
