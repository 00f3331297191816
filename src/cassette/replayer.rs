//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Serves interactions from a loaded cassette in recorded order, one
/// sequence per port.
///
/// Calls on one port share a single cursor, so the relative order of
/// different methods is part of what gets replayed.
#[derive(Debug)]
pub struct CassetteReplayer {
    /// Per port sequence of interactions, ordered by `seq`.
    queues: HashMap<String, Vec<Interaction>>,
    /// Per port cursor tracking position.
    cursors: HashMap<String, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<String, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues.entry(interaction.port.clone()).or_default().push(interaction.clone());
        }
        for queue in queues.values_mut() {
            queue.sort_by_key(|i| i.seq);
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next interaction recorded on `port`, which must be a call
    /// to `method`.
    ///
    /// The interaction is consumed even when the method differs, so one
    /// out-of-place call does not shift every later comparison.
    ///
    /// # Errors
    ///
    /// Returns a message naming what was requested when the port has no
    /// (more) interactions, or when the next one is a different method.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<&Interaction, String> {
        let Some(queue) = self.queues.get(port) else {
            let mut available: Vec<&str> = self.queues.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(format!(
                "Cassette exhausted: no interactions recorded for port={port:?}. \
                 Available ports: [{}]",
                available.join(", ")
            ));
        };

        let cursor = self.cursors.entry(port.to_string()).or_insert(0);
        if *cursor >= queue.len() {
            return Err(format!(
                "Cassette exhausted: all {count} interactions for port={port:?} \
                 have been consumed. Last interaction was seq={last_seq}.",
                count = queue.len(),
                last_seq = queue.last().map_or(0, |i| i.seq),
            ));
        }

        let interaction = &queue[*cursor];
        *cursor += 1;
        if interaction.method != method {
            return Err(format!(
                "Out of order: expected {expected} at seq={seq}, got {method} on port={port:?}",
                expected = interaction.method,
                seq = interaction.seq,
            ));
        }
        Ok(interaction)
    }

    /// Number of interactions not yet served, across all ports.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues
            .iter()
            .map(|(port, queue)| queue.len() - self.cursors.get(port).copied().unwrap_or(0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, method: &str, element: u32) -> Interaction {
        Interaction {
            seq,
            port: "dom".into(),
            method: method.into(),
            input: json!({"element": element}),
            output: json!(null),
        }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), source: "nav".into(), interactions }
    }

    #[test]
    fn serves_port_in_recorded_order() {
        let cassette = make_cassette(vec![
            interaction(0, "remove_classes", 1),
            interaction(1, "add_classes", 2),
            interaction(2, "remove_classes", 3),
        ]);

        let mut replayer = CassetteReplayer::new(&cassette);
        assert_eq!(replayer.remaining(), 3);

        assert_eq!(replayer.next_interaction("dom", "remove_classes").unwrap().seq, 0);
        assert_eq!(replayer.next_interaction("dom", "add_classes").unwrap().seq, 1);
        assert_eq!(replayer.next_interaction("dom", "remove_classes").unwrap().seq, 2);
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    fn method_out_of_order_is_an_error() {
        let cassette = make_cassette(vec![
            interaction(0, "remove_classes", 1),
            interaction(1, "add_classes", 1),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        let err = replayer.next_interaction("dom", "add_classes").unwrap_err();
        assert!(err.contains("expected remove_classes at seq=0"));
        let err = replayer.next_interaction("dom", "remove_classes").unwrap_err();
        assert!(err.contains("expected add_classes at seq=1"));
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    fn exhausted_port_is_an_error() {
        let cassette = make_cassette(vec![interaction(0, "add_classes", 1)]);
        let mut replayer = CassetteReplayer::new(&cassette);
        assert!(replayer.next_interaction("dom", "add_classes").is_ok());
        let err = replayer.next_interaction("dom", "add_classes").unwrap_err();
        assert!(err.contains("Cassette exhausted"));
        assert!(err.contains("seq=0"));
    }

    #[test]
    fn unknown_port_lists_available_ports() {
        let cassette = make_cassette(vec![interaction(0, "add_classes", 1)]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let err = replayer.next_interaction("style", "add_classes").unwrap_err();
        assert!(err.contains("no interactions recorded"));
        assert!(err.contains("[dom]"));
    }
}
