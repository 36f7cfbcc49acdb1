use serde::{Deserialize, Serialize};

/// Role of an identifier in the lineage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityKind {
    Participant,
    Sample,
}

/// One row of the lineage table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub kind: IdentityKind,
    pub id: String,
    /// `None` for participants.
    pub parent_id: Option<String>,
}

/// Participant/sample identifier hierarchy of one atlas, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageTable {
    rows: Vec<IdentityRecord>,
}

impl LineageTable {
    /// Build the lineage for `root_key`.
    ///
    /// Participants are `{root_key}_{i}`, each followed by its samples
    /// `{participant}_{j}`. A sample is written with the current parent
    /// cursor; afterwards the cursor moves to that sample when `j` is even and
    /// back to the participant when `j` is odd, giving
    /// `s0 -> p, s1 -> s0, s2 -> p, s3 -> s2, ...`.
    pub fn generate(
        root_key: &str,
        participant_count: usize,
        samples_per_participant: usize,
    ) -> Self {
        let mut rows = Vec::with_capacity(participant_count * (samples_per_participant + 1));

        for participant in 0..participant_count {
            let participant_id = format!("{root_key}_{participant}");
            rows.push(IdentityRecord {
                kind: IdentityKind::Participant,
                id: participant_id.clone(),
                parent_id: None,
            });

            let mut cursor = participant_id.clone();
            for sample in 0..samples_per_participant {
                let sample_id = format!("{participant_id}_{sample}");
                rows.push(IdentityRecord {
                    kind: IdentityKind::Sample,
                    id: sample_id.clone(),
                    parent_id: Some(cursor),
                });
                cursor = if sample % 2 == 0 {
                    sample_id
                } else {
                    participant_id.clone()
                };
            }
        }

        Self { rows }
    }

    pub fn rows(&self) -> &[IdentityRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ids of the given kind in generation order.
    pub fn filter_by_kind(&self, kind: IdentityKind) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| row.kind == kind)
            .map(|row| row.id.as_str())
            .collect()
    }

    pub fn participant_ids(&self) -> Vec<&str> {
        self.filter_by_kind(IdentityKind::Participant)
    }

    pub fn sample_ids(&self) -> Vec<&str> {
        self.filter_by_kind(IdentityKind::Sample)
    }

    /// Parent of the first row carrying `id`; `None` for unknown ids and participants.
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.id == id)
            .and_then(|row| row.parent_id.as_deref())
    }
}
