use sha2::{Digest, Sha256};

use super::domain::{SignalPayload, SignalSet};

/// Content hash of a single signal payload, used to version the record.
pub(crate) fn content_fingerprint(payload: &SignalPayload) -> Result<String, serde_json::Error> {
    let encoded = serde_json::to_vec(payload)?;
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    Ok(hex::encode(hasher.finalize()))
}

/// Combined hash over every present signal's fingerprint.
///
/// Pairs are folded in canonical category order, so the result is independent
/// of write order and changes whenever any one signal changes.
pub(crate) fn combined_input_hash(signals: &SignalSet) -> String {
    let mut hasher = Sha256::new();
    for record in signals.present() {
        hasher.update(record.category.label().as_bytes());
        hasher.update(b":");
        hasher.update(record.input_hash.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::super::domain::{
        AcademicSignal, SignalRecord, SignalSet, SkillsSignal,
    };
    use super::*;

    fn record(payload: SignalPayload) -> SignalRecord {
        let input_hash = content_fingerprint(&payload).expect("payload encodes");
        SignalRecord {
            category: payload.category(),
            payload,
            input_hash,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn fingerprint_is_stable_for_equal_payloads() {
        let first = SignalPayload::Academic(AcademicSignal { cgpa: 8.2 });
        let second = SignalPayload::Academic(AcademicSignal { cgpa: 8.2 });
        assert_eq!(
            content_fingerprint(&first).expect("encodes"),
            content_fingerprint(&second).expect("encodes"),
        );
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let first = SignalPayload::Academic(AcademicSignal { cgpa: 8.2 });
        let second = SignalPayload::Academic(AcademicSignal { cgpa: 8.3 });
        assert_ne!(
            content_fingerprint(&first).expect("encodes"),
            content_fingerprint(&second).expect("encodes"),
        );
    }

    #[test]
    fn combined_hash_ignores_write_order() {
        let academic = record(SignalPayload::Academic(AcademicSignal { cgpa: 7.5 }));
        let skills = record(SignalPayload::Skills(SkillsSignal {
            skills: vec!["Python".to_string(), "SQL".to_string()],
        }));

        let mut first = SignalSet::default();
        first.replace(academic.clone());
        first.replace(skills.clone());

        let mut second = SignalSet::default();
        second.replace(skills);
        second.replace(academic);

        assert_eq!(combined_input_hash(&first), combined_input_hash(&second));
    }

    #[test]
    fn combined_hash_tracks_any_slot_change() {
        let mut signals = SignalSet::default();
        signals.replace(record(SignalPayload::Academic(AcademicSignal { cgpa: 7.5 })));
        let before = combined_input_hash(&signals);

        signals.replace(record(SignalPayload::Academic(AcademicSignal { cgpa: 9.0 })));
        assert_ne!(before, combined_input_hash(&signals));
    }
}
