//! The fixed human-verification checklist.
//!
//! These entries cover WCAG requirements that automated tree inspection
//! cannot decide. The generator is a pure function of the target name; every
//! entry starts [`crate::domain::ManualStatus::Pending`] and is only ever
//! resolved by a human through [`ManualTest::record_outcome`].

use nonempty::nonempty;

use crate::{
    checks::wcag,
    domain::{ManualTest, WcagLevel},
};

/// Generate the manual checklist for a target.
#[must_use]
pub fn checklist(target: &str) -> Vec<ManualTest> {
    vec![
        ManualTest::new(
            "screen-reader-announcement",
            format!("all meaningful content of '{target}' is announced by a screen reader"),
            vec![
                "open the target with a screen reader running (NVDA, VoiceOver, or Orca)"
                    .to_string(),
                "navigate the full page with reading commands only".to_string(),
                "confirm every visible piece of information is announced, in a sensible order"
                    .to_string(),
            ],
            WcagLevel::A,
            nonempty![wcag("1.3.1"), wcag("4.1.2")],
        ),
        ManualTest::new(
            "focus-order-and-visibility",
            format!("keyboard focus in '{target}' follows the visual order and is always visible"),
            vec![
                "put the cursor in the address bar, then tab into the page".to_string(),
                "tab through every interactive element".to_string(),
                "confirm the focus indicator is visible at each stop".to_string(),
                "confirm the order matches the visual layout".to_string(),
            ],
            WcagLevel::AA,
            nonempty![wcag("2.4.3"), wcag("2.4.7")],
        ),
        ManualTest::new(
            "color-independence",
            format!("no information in '{target}' is conveyed by color alone"),
            vec![
                "view the target in grayscale (OS filter or browser devtools)".to_string(),
                "confirm states, links, and errors are still distinguishable".to_string(),
            ],
            WcagLevel::A,
            nonempty![wcag("1.4.1")],
        ),
        ManualTest::new(
            "text-resize-200",
            format!("'{target}' remains usable with text scaled to 200%"),
            vec![
                "set browser zoom or text size to 200%".to_string(),
                "confirm no text is clipped or overlapped".to_string(),
                "confirm all functionality remains reachable".to_string(),
            ],
            WcagLevel::AA,
            nonempty![wcag("1.4.4")],
        ),
        ManualTest::new(
            "reduced-motion",
            format!("'{target}' respects the user's reduced-motion preference"),
            vec![
                "enable the OS reduce-motion setting".to_string(),
                "reload the target".to_string(),
                "confirm non-essential animation is disabled or substantially reduced"
                    .to_string(),
            ],
            WcagLevel::AAA,
            nonempty![wcag("2.3.3")],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ManualStatus;

    #[test]
    fn generates_five_pending_entries() {
        let tests = checklist("checkout");
        assert_eq!(tests.len(), 5);
        assert!(tests.iter().all(|t| t.status == ManualStatus::Pending));
    }

    #[test]
    fn entries_have_steps_and_citations() {
        for test in checklist("checkout") {
            assert!(!test.verification_steps.is_empty(), "{}", test.id);
            assert!(!test.wcag_criteria.first().as_str().is_empty(), "{}", test.id);
        }
    }

    #[test]
    fn checklist_is_deterministic() {
        assert_eq!(checklist("dashboard"), checklist("dashboard"));
    }

    #[test]
    fn descriptions_mention_the_target() {
        assert!(checklist("settings")
            .iter()
            .all(|t| t.description.contains("settings")));
    }

    #[test]
    fn ids_are_unique() {
        let tests = checklist("any");
        let mut ids: Vec<_> = tests.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), tests.len());
    }
}
