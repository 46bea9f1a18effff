use std::collections::HashSet;

use super::FormId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPartition<T> {
    pub pending: Vec<T>,
    pub completed: Vec<T>,
}

impl<T> Default for FormPartition<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            completed: Vec::new(),
        }
    }
}

/// Splits the forms a student can see by whether they already submitted them.
/// Input order is kept within each side.
pub fn partition_forms<T>(
    forms: impl IntoIterator<Item = T>,
    submitted: &HashSet<FormId>,
    form_id: impl Fn(&T) -> FormId,
) -> FormPartition<T> {
    let mut partition = FormPartition::default();

    for form in forms {
        if submitted.contains(&form_id(&form)) {
            partition.completed.push(form);
        } else {
            partition.pending.push(form);
        }
    }

    partition
}
