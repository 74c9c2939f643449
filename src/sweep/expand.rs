//! Expansion of named argument axes into concrete assignments.
//!
//! Two distinct semantics, and the distinction matters:
//!
//! - **cartesian**: every combination of one value per axis. Used for
//!   accelerator options, where each option varies independently.
//! - **parallel**: same-index values across all axes form one assignment.
//!   Used for series arguments, where the axes describe one pointwise list
//!   of bindings, not a grid.
//!
//! Parallel expansion validates lengths explicitly: a bare zip would silently
//! truncate to the shortest axis and hide sweep-authoring mistakes.

use crate::domain::{Assignment, Axes};
use crate::error::AppError;

/// Lazy iterator over the cartesian product of named option axes.
///
/// Assignments are produced in the product order of the axes as given
/// (first axis slowest, last axis fastest) and, within each axis, in the
/// order of its candidate list. An empty axes list yields exactly one empty
/// assignment; an axis with zero candidates yields nothing at all.
pub struct CartesianAssignments<'a> {
    axes: &'a Axes,
    indices: Vec<usize>,
    done: bool,
}

impl Iterator for CartesianAssignments<'_> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        if self.done {
            return None;
        }

        let entries = self
            .axes
            .iter()
            .zip(self.indices.iter())
            .map(|((name, values), &idx)| (name.clone(), values[idx].clone()))
            .collect();

        // Odometer increment: last axis varies fastest.
        self.done = true;
        for pos in (0..self.axes.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < self.axes[pos].1.len() {
                self.done = false;
                break;
            }
            self.indices[pos] = 0;
        }

        Some(Assignment::from_entries(entries))
    }
}

/// Expand option axes into every concrete assignment, lazily.
pub fn expand_cartesian(options: &Axes) -> CartesianAssignments<'_> {
    // Any empty axis collapses the whole product to zero assignments.
    let degenerate = options.iter().any(|(_, values)| values.is_empty());
    CartesianAssignments {
        axes: options,
        indices: vec![0; options.len()],
        done: degenerate,
    }
}

/// Zip same-index values across axes into one assignment per index.
///
/// All axes must have the same length; a disagreement is a sweep-authoring
/// bug and aborts the run. An empty axes list yields one empty assignment so
/// argument-free series still execute once.
pub fn expand_parallel(axes: &Axes) -> Result<Vec<Assignment>, AppError> {
    let Some((_, first)) = axes.first() else {
        return Ok(vec![Assignment::empty()]);
    };

    let len = first.len();
    for (name, values) in axes {
        if values.len() != len {
            let shape: Vec<String> = axes
                .iter()
                .map(|(name, values)| format!("{name}({})", values.len()))
                .collect();
            return Err(AppError::shape_mismatch(format!(
                "parallel argument axes must have equal lengths, got {} (axis '{name}' disagrees)",
                shape.join(", ")
            )));
        }
    }

    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let entries = axes
            .iter()
            .map(|(name, values)| (name.clone(), values[i].clone()))
            .collect();
        out.push(Assignment::from_entries(entries));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParamValue;

    fn axes(spec: &[(&str, &[i64])]) -> Axes {
        spec.iter()
            .map(|(name, values)| {
                (
                    name.to_string(),
                    values.iter().map(|&v| ParamValue::Int(v)).collect(),
                )
            })
            .collect()
    }

    fn flat(assignment: &Assignment) -> String {
        assignment.to_compact_string()
    }

    #[test]
    fn cartesian_yields_full_product_in_order() {
        let axes = axes(&[("a", &[1, 2]), ("b", &[3, 4])]);
        let got: Vec<String> = expand_cartesian(&axes).map(|a| flat(&a)).collect();
        assert_eq!(
            got,
            vec!["a=1, b=3", "a=1, b=4", "a=2, b=3", "a=2, b=4"]
        );
    }

    #[test]
    fn cartesian_of_no_axes_is_one_empty_assignment() {
        let axes: Axes = Vec::new();
        let got: Vec<Assignment> = expand_cartesian(&axes).collect();
        assert_eq!(got.len(), 1);
        assert!(got[0].is_empty());
    }

    #[test]
    fn cartesian_with_an_empty_axis_yields_nothing() {
        let axes = axes(&[("a", &[1, 2]), ("b", &[])]);
        assert_eq!(expand_cartesian(&axes).count(), 0);
    }

    #[test]
    fn cartesian_is_lazy() {
        let axes = axes(&[("a", &[1, 2, 3]), ("b", &[1, 2, 3]), ("c", &[1, 2, 3])]);
        // Only pull two assignments out of the 27; enumeration must not
        // require materializing the rest.
        let got: Vec<String> = expand_cartesian(&axes).take(2).map(|a| flat(&a)).collect();
        assert_eq!(got, vec!["a=1, b=1, c=1", "a=1, b=1, c=2"]);
    }

    #[test]
    fn parallel_zips_same_index_values() {
        let axes = axes(&[("x", &[1, 2, 3]), ("scale", &[10, 20, 30])]);
        let got = expand_parallel(&axes).unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(flat(&got[0]), "x=1, scale=10");
        assert_eq!(flat(&got[2]), "x=3, scale=30");
    }

    #[test]
    fn parallel_run_count_equals_common_axis_length() {
        let axes = axes(&[("x", &[5, 6, 7, 8])]);
        assert_eq!(expand_parallel(&axes).unwrap().len(), 4);
    }

    #[test]
    fn parallel_rejects_unequal_lengths() {
        let axes = axes(&[("x", &[1, 2, 3]), ("scale", &[10, 20])]);
        let err = expand_parallel(&axes).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("shape mismatch"));
    }

    #[test]
    fn parallel_of_no_axes_is_one_empty_assignment() {
        let got = expand_parallel(&Vec::new()).unwrap();
        assert_eq!(got.len(), 1);
        assert!(got[0].is_empty());
    }
}
