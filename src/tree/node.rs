use crate::predicate::Predicate;

/// Per-value training statistics stored on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDistribution {
    pub value: String,
    pub record_count: f64,
    pub confidence: Option<f64>,
}

impl ScoreDistribution {
    pub fn new(value: impl Into<String>, record_count: f64) -> Self {
        Self {
            value: value.into(),
            record_count,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// One node of a decision tree.
///
/// The predicate decides whether the node is entered from its parent.
/// Children are kept in document order, which is also the tie-break order
/// for multi-way splits.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: Option<String>,
    pub predicate: Predicate,
    pub score: Option<String>,
    pub record_count: Option<f64>,
    pub score_distributions: Vec<ScoreDistribution>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            id: None,
            predicate,
            score: None,
            record_count: None,
            score_distributions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.score = Some(score.into());
        self
    }

    pub fn with_record_count(mut self, record_count: f64) -> Self {
        self.record_count = Some(record_count);
        self
    }

    pub fn with_distribution(mut self, distribution: ScoreDistribution) -> Self {
        self.score_distributions.push(distribution);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Label used in logs and error messages: the id if there is one.
    pub fn label(&self) -> &str {
        self.id
            .as_deref()
            .or(self.score.as_deref())
            .unwrap_or("<anonymous>")
    }

    /// Confidence for `value` at this node.
    ///
    /// Uses the matching distribution's explicit confidence, otherwise its
    /// share of the node's total record count. Zero when nothing matches.
    pub fn confidence_for(&self, value: &str) -> f64 {
        let Some(entry) = self.score_distributions.iter().find(|d| d.value == value) else {
            return 0.0;
        };
        if let Some(confidence) = entry.confidence {
            return confidence;
        }
        let total: f64 = self.score_distributions.iter().map(|d| d.record_count).sum();
        if total > 0.0 {
            entry.record_count / total
        } else {
            0.0
        }
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Total number of nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }
}
