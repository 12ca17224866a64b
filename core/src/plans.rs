//! Local, offline action plans for each scam scenario.

use serde::Serialize;

use crate::scenario::Scenario;

/// A published source backing a plan's advice.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SourceRef {
    pub id: &'static str,
    pub title: &'static str,
    pub org: &'static str,
    pub date: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActionPlan {
    pub key: &'static str,
    pub title: &'static str,
    pub when: &'static str,
    pub do_now: Vec<&'static str>,
    pub next_steps: Vec<&'static str>,
    pub who_to_contact: Vec<&'static str>,
    pub evidence: Vec<&'static str>,
    pub caveat: &'static str,
    pub sources: Vec<SourceRef>,
}

const SOURCES: &[SourceRef] = &[
    SourceRef {
        id: "NFCC-NSRC-997-2026-01-05",
        title: "Hubungi Pusat Respons Scam Kebangsaan (NSRC) di talian 997",
        org: "NFCC (JPM)",
        date: "2026-01-05",
        url: "https://nfcc.jpm.gov.my/index.php?speech-hubungi-pusat-respons-scam-kebangsaan-nsrc-di-talian-997/",
    },
    SourceRef {
        id: "PDRM-SEMAK-MULE-2020-10-07",
        title: "Portal dan aplikasi Semak Mule bantu pengguna kesan akaun 'scammer'",
        org: "PDRM",
        date: "2020-10-07",
        url: "https://www.rmp.gov.my/news-detail/2020/10/07/portal-dan-aplikasi-semak-mule-bantu-pengguna-kesan-akaun-scammer",
    },
];

/// Plan for a scenario.
pub fn action_plan(scenario: Scenario) -> ActionPlan {
    let (title, when) = heading(scenario);
    let mut plan = base_plan(scenario.key(), title, when);
    if scenario == Scenario::MoneyMoved {
        plan.do_now = vec![
            "Call your bank immediately to freeze/stop further transfers and flag the transaction as suspected scam.",
            "Call NSRC 997 as soon as possible and follow their instructions.",
            "Do not make additional transfers to 'recover' money or to any 'safe account'.",
            "Preserve evidence and note the exact time the transfer happened.",
            "Check any recipient accounts via PDRM Semak Mule and record the result.",
        ];
    }
    plan
}

/// Plan for a free-form label, normalized first.
pub fn action_plan_for(label: &str) -> ActionPlan {
    action_plan(Scenario::normalize(label))
}

fn heading(scenario: Scenario) -> (&'static str, &'static str) {
    match scenario {
        Scenario::MoneyMoved => ("Money moved", "Immediately"),
        Scenario::AskedToPay => ("Asked to pay", "Before paying anything"),
        Scenario::OtpPassword => ("OTP / password", "Immediately"),
        Scenario::Courier => ("Courier / parcel", "Before paying 'fees' or sharing details"),
        Scenario::Investment => ("Investment", "Before transferring any funds"),
        Scenario::Job => ("Job offer / recruitment", "Before paying 'processing' fees"),
        Scenario::Romance => ("Romance / love scam", "Before sending money or gifts"),
        Scenario::Impersonation => ("Impersonation", "Immediately"),
        Scenario::Other => ("Other", "Now"),
    }
}

fn base_plan(key: &'static str, title: &'static str, when: &'static str) -> ActionPlan {
    ActionPlan {
        key,
        title,
        when,
        do_now: vec![
            "Stop engaging. Don't click links, scan QR codes, or install apps requested by the other party.",
            "Do not share OTP/TAC/passwords or let anyone 'remote-control' your device.",
            "Verify using official numbers from official websites, not numbers given by the scammer.",
            "If money has moved, contact your bank immediately and call NSRC 997.",
            "Check account numbers (if provided) using PDRM Semak Mule.",
        ],
        next_steps: vec![
            "Save evidence (screenshots, chat logs, phone numbers, URLs, bank details, receipts).",
            "Warn a trusted person before taking any next step.",
            "If you're unsure or it feels urgent, treat it as high risk and escalate to your bank / authorities.",
        ],
        who_to_contact: vec![
            "NSRC 997 (if money has moved / online financial fraud)",
            "Your bank's fraud hotline (immediately if funds were transferred)",
            "PDRM (make a police report where appropriate)",
        ],
        evidence: vec![
            "Screenshots of the full conversation (including the profile + timestamps)",
            "Phone number(s), usernames, URLs, QR codes",
            "Bank account number(s) / beneficiary details",
            "Payment receipts / transaction references",
        ],
        caveat: "This is informational guidance. It may be incomplete. For urgent cases or if money has moved, contact your bank and the relevant authorities immediately.",
        sources: SOURCES.to_vec(),
    }
}
