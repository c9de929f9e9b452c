use super::model::TreeModel;
use super::node::Node;
use super::strategy::SplitCharacteristic;
use crate::predicate::Predicate;

/// Prefix marking findings that do not make a model unusable.
pub const WARNING_PREFIX: &str = "warning:";

/// Validate the structure of a loaded model.
/// Returns all findings at once (not just the first). Entries starting with
/// [`WARNING_PREFIX`] are advisory; the rest make scoring unreliable.
pub fn validate_model(model: &TreeModel) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let root = model.root();

    if root.predicate != Predicate::True {
        errors.push(format!(
            "{} root node '{}': predicate is not <True/>",
            WARNING_PREFIX,
            root.label()
        ));
    }

    validate_node(root, "root", model.split_characteristic(), &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// True when every finding is only a warning.
pub fn only_warnings(findings: &[String]) -> bool {
    findings.iter().all(|f| f.starts_with(WARNING_PREFIX))
}

fn validate_node(node: &Node, path: &str, split: SplitCharacteristic, errors: &mut Vec<String>) {
    if split == SplitCharacteristic::BinarySplit && node.children.len() > 2 {
        errors.push(format!(
            "{}: {} children under a binary split",
            path,
            node.children.len()
        ));
    }

    if let Some(count) = node.record_count {
        if count < 0.0 {
            errors.push(format!("{}.recordCount: must be non-negative", path));
        }
    }

    for (i, distribution) in node.score_distributions.iter().enumerate() {
        if distribution.record_count < 0.0 {
            errors.push(format!(
                "{}.scoreDistribution[{}].recordCount: must be non-negative",
                path, i
            ));
        }
        if let Some(confidence) = distribution.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                errors.push(format!(
                    "{}.scoreDistribution[{}].confidence: {} is outside [0, 1]",
                    path, i, confidence
                ));
            }
        }
    }

    if node.is_leaf() && node.score.is_none() {
        errors.push(format!("{}: leaf has no score", path));
    }

    for (i, child) in node.children.iter().enumerate() {
        let child_path = match &child.id {
            Some(id) => format!("{}/{}", path, id),
            None => format!("{}/{}", path, i),
        };
        validate_node(child, &child_path, split, errors);
    }
}
