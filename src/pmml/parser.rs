use super::Pmml;
use crate::error::PmmlError;
use crate::predicate::{BooleanOperator, Predicate, SetOperator, SimpleOperator};
use crate::tree::{MiningField, Node, ScoreDistribution, TreeModel};
use roxmltree::Node as XmlNode;
use std::str::FromStr;
use tracing::{debug, warn};

const PREDICATE_ELEMENTS: [&str; 5] = [
    "True",
    "False",
    "SimplePredicate",
    "SimpleSetPredicate",
    "CompoundPredicate",
];

/// Top-level children of `PMML` that are not models.
const DOCUMENT_METADATA: [&str; 6] = [
    "Header",
    "DataDictionary",
    "MiningBuildTask",
    "TransformationDictionary",
    "Extension",
    "Taxonomy",
];

/// Parse a whole PMML document into a registry of tree models.
pub(crate) fn parse_document(xml: &str) -> Result<Pmml, PmmlError> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "PMML" {
        return Err(PmmlError::UnexpectedElement {
            parent: "document",
            found: root.tag_name().name().to_string(),
        });
    }

    let mut pmml = Pmml {
        version: root.attribute("version").map(str::to_string),
        description: None,
        models: Default::default(),
    };

    let mut tree_index = 0usize;
    for element in elements(root) {
        let name = element.tag_name().name();
        match name {
            "Header" => {
                pmml.description = element.attribute("description").map(str::to_string);
            }
            "TreeModel" => {
                let model = parse_tree_model(element)?;
                let key = model
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("model-{}", tree_index));
                tree_index += 1;
                debug!(model = %key, nodes = model.root().node_count(), "loaded tree model");
                if pmml.models.insert(key.clone(), model).is_some() {
                    return Err(PmmlError::DuplicateModel(key));
                }
            }
            _ if DOCUMENT_METADATA.contains(&name) => {}
            other => warn!(element = other, "skipping unsupported model element"),
        }
    }

    if pmml.models.is_empty() {
        return Err(PmmlError::NoTreeModel);
    }
    Ok(pmml)
}

fn parse_tree_model(element: XmlNode) -> Result<TreeModel, PmmlError> {
    const ELEMENT: &str = "TreeModel";

    let mut mining_fields = Vec::new();
    let mut root = None;

    for child in elements(element) {
        match child.tag_name().name() {
            "MiningSchema" => {
                for field in elements(child).filter(|f| f.tag_name().name() == "MiningField") {
                    mining_fields.push(MiningField {
                        name: required(field, "MiningField", "name")?.to_string(),
                        usage_type: field.attribute("usageType").map(str::to_string),
                    });
                }
            }
            "Node" => {
                if root.is_some() {
                    return Err(PmmlError::UnexpectedElement {
                        parent: ELEMENT,
                        found: "second root Node".to_string(),
                    });
                }
                root = Some(parse_node(child)?);
            }
            // Output, Targets, ModelStats and friends carry nothing the scorer uses.
            _ => {}
        }
    }

    let root = root.ok_or(PmmlError::MissingElement {
        parent: ELEMENT,
        element: "Node",
    })?;

    let mut model = TreeModel::new(root);
    model.name = element.attribute("modelName").map(str::to_string);
    model.function_name = element.attribute("functionName").map(str::to_string);
    model.mining_fields = mining_fields;

    if let Some(split) = parse_attr(element, ELEMENT, "splitCharacteristic")? {
        model = model.with_split_characteristic(split);
    }
    if let Some(strategy) = parse_attr(element, ELEMENT, "missingValueStrategy")? {
        model.set_missing_value_strategy(strategy);
    }
    if let Some(strategy) = parse_attr(element, ELEMENT, "noTrueChildStrategy")? {
        model.set_no_true_child_strategy(strategy);
    }

    Ok(model)
}

fn parse_node(element: XmlNode) -> Result<Node, PmmlError> {
    const ELEMENT: &str = "Node";

    let mut predicate = None;
    let mut score_distributions = Vec::new();
    let mut children = Vec::new();

    for child in elements(element) {
        let name = child.tag_name().name();
        match name {
            _ if PREDICATE_ELEMENTS.contains(&name) => {
                if predicate.is_some() {
                    return Err(PmmlError::UnexpectedElement {
                        parent: ELEMENT,
                        found: format!("second predicate {}", name),
                    });
                }
                predicate = Some(parse_predicate(child)?);
            }
            "ScoreDistribution" => score_distributions.push(parse_distribution(child)?),
            "Node" => children.push(parse_node(child)?),
            "Extension" | "Partition" => {}
            "Regression" | "DecisionTree" => {
                warn!(element = name, "ignoring embedded model inside Node")
            }
            other => {
                return Err(PmmlError::UnexpectedElement {
                    parent: ELEMENT,
                    found: other.to_string(),
                })
            }
        }
    }

    Ok(Node {
        id: element.attribute("id").map(str::to_string),
        predicate: predicate.ok_or(PmmlError::MissingPredicate(ELEMENT))?,
        score: element.attribute("score").map(str::to_string),
        record_count: parse_attr(element, ELEMENT, "recordCount")?,
        score_distributions,
        children,
    })
}

fn parse_distribution(element: XmlNode) -> Result<ScoreDistribution, PmmlError> {
    const ELEMENT: &str = "ScoreDistribution";

    let record_count = parse_attr(element, ELEMENT, "recordCount")?.ok_or(
        PmmlError::MissingAttribute {
            element: ELEMENT,
            attribute: "recordCount",
        },
    )?;
    let confidence = match parse_attr(element, ELEMENT, "confidence")? {
        Some(confidence) => Some(confidence),
        None => parse_attr(element, ELEMENT, "probability")?,
    };

    Ok(ScoreDistribution {
        value: required(element, ELEMENT, "value")?.to_string(),
        record_count,
        confidence,
    })
}

fn parse_predicate(element: XmlNode) -> Result<Predicate, PmmlError> {
    match element.tag_name().name() {
        "True" => Ok(Predicate::True),
        "False" => Ok(Predicate::False),
        "SimplePredicate" => {
            const ELEMENT: &str = "SimplePredicate";
            let field = required(element, ELEMENT, "field")?;
            let operator = SimpleOperator::from_str(required(element, ELEMENT, "operator")?)?;
            let value = if operator.requires_value() {
                Some(required(element, ELEMENT, "value")?.to_string())
            } else {
                None
            };
            Ok(Predicate::Simple {
                field: field.to_string(),
                operator,
                value,
            })
        }
        "SimpleSetPredicate" => {
            const ELEMENT: &str = "SimpleSetPredicate";
            let field = required(element, ELEMENT, "field")?;
            let operator = SetOperator::from_str(required(element, ELEMENT, "booleanOperator")?)?;
            let array = elements(element)
                .find(|child| child.tag_name().name() == "Array")
                .ok_or(PmmlError::MissingElement {
                    parent: ELEMENT,
                    element: "Array",
                })?;
            Ok(Predicate::SimpleSet {
                field: field.to_string(),
                operator,
                values: parse_array(array.text().unwrap_or_default()),
            })
        }
        "CompoundPredicate" => {
            const ELEMENT: &str = "CompoundPredicate";
            let operator =
                BooleanOperator::from_str(required(element, ELEMENT, "booleanOperator")?)?;
            let operands = elements(element)
                .filter(|child| child.tag_name().name() != "Extension")
                .map(parse_predicate)
                .collect::<Result<Vec<_>, _>>()?;
            if operands.is_empty() {
                return Err(PmmlError::MissingPredicate(ELEMENT));
            }
            Ok(Predicate::Compound { operator, operands })
        }
        other => Err(PmmlError::UnexpectedElement {
            parent: "predicate",
            found: other.to_string(),
        }),
    }
}

/// Split PMML array content into values.
///
/// Tokens are whitespace separated; double-quoted tokens may contain spaces
/// and `\"` escapes.
pub(crate) fn parse_array(text: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut chars = text.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        let mut token = String::new();
        if first == '"' {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '\\' if chars.peek() == Some(&'"') => {
                        token.push('"');
                        chars.next();
                    }
                    '"' => break,
                    _ => token.push(c),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                token.push(c);
            }
        }
        values.push(token);
    }

    values
}

fn elements<'a, 'input>(
    node: XmlNode<'a, 'input>,
) -> impl Iterator<Item = XmlNode<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

fn required<'a>(
    node: XmlNode<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, PmmlError> {
    node.attribute(attribute)
        .ok_or(PmmlError::MissingAttribute { element, attribute })
}

fn parse_attr<T: FromStr>(
    node: XmlNode,
    element: &'static str,
    attribute: &'static str,
) -> Result<Option<T>, PmmlError> {
    match node.attribute(attribute) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PmmlError::InvalidAttribute {
                element,
                attribute,
                value: raw.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluationError;
    use crate::tree::{MissingValueStrategy, NoTrueChildStrategy, SplitCharacteristic};

    fn wrap(model: &str) -> String {
        format!(
            r#"<?xml version="1.0" ?>
<PMML version="4.1" xmlns="http://www.dmg.org/PMML-4_1">
  <Header description="test"/>
  {}
</PMML>"#,
            model
        )
    }

    #[test]
    fn test_parse_array_plain_and_quoted() {
        assert_eq!(parse_array("1 5 9"), vec!["1", "5", "9"]);
        assert_eq!(
            parse_array(r#"  "New York" Boston "say \"hi\"" "#),
            vec!["New York", "Boston", r#"say "hi""#]
        );
        assert!(parse_array("   ").is_empty());
        assert_eq!(parse_array(r#""""#), vec![""]);
    }

    #[test]
    fn test_header_and_version() {
        let pmml = parse_document(&wrap(
            r#"<TreeModel modelName="m"><Node score="x"><True/></Node></TreeModel>"#,
        ))
        .unwrap();
        assert_eq!(pmml.version.as_deref(), Some("4.1"));
        assert_eq!(pmml.description.as_deref(), Some("test"));
    }

    #[test]
    fn test_model_attributes() {
        let pmml = parse_document(&wrap(
            r#"<TreeModel modelName="m" functionName="classification"
                   missingValueStrategy="nullPrediction"
                   noTrueChildStrategy="returnLastPrediction"
                   splitCharacteristic="binarySplit">
                 <MiningSchema>
                   <MiningField name="a"/>
                   <MiningField name="y" usageType="predicted"/>
                 </MiningSchema>
                 <Node score="x"><True/></Node>
               </TreeModel>"#,
        ))
        .unwrap();
        let model = pmml.get_by_name("m").unwrap();
        assert_eq!(model.function_name.as_deref(), Some("classification"));
        assert_eq!(model.missing_value_strategy(), MissingValueStrategy::NullPrediction);
        assert_eq!(
            model.no_true_child_strategy(),
            NoTrueChildStrategy::ReturnLastPrediction
        );
        assert_eq!(model.split_characteristic(), SplitCharacteristic::BinarySplit);
        assert_eq!(model.mining_fields.len(), 2);
        assert_eq!(model.mining_fields[1].usage_type.as_deref(), Some("predicted"));
    }

    #[test]
    fn test_unnamed_models_get_positional_names() {
        let pmml = parse_document(&wrap(
            r#"<TreeModel><Node score="a"><True/></Node></TreeModel>
               <TreeModel><Node score="b"><True/></Node></TreeModel>"#,
        ))
        .unwrap();
        assert!(pmml.get_by_name("model-0").is_some());
        assert!(pmml.get_by_name("model-1").is_some());
    }

    #[test]
    fn test_other_models_are_skipped() {
        let pmml = parse_document(&wrap(
            r#"<RegressionModel functionName="regression"/>
               <TreeModel modelName="t"><Node score="a"><True/></Node></TreeModel>"#,
        ))
        .unwrap();
        assert_eq!(pmml.len(), 1);
    }

    #[test]
    fn test_no_tree_model() {
        let err = parse_document(&wrap(r#"<RegressionModel/>"#)).unwrap_err();
        assert!(matches!(err, PmmlError::NoTreeModel));
    }

    #[test]
    fn test_duplicate_model_names() {
        let err = parse_document(&wrap(
            r#"<TreeModel modelName="t"><Node><True/></Node></TreeModel>
               <TreeModel modelName="t"><Node><True/></Node></TreeModel>"#,
        ))
        .unwrap_err();
        assert!(matches!(err, PmmlError::DuplicateModel(name) if name == "t"));
    }

    #[test]
    fn test_simple_predicate_requires_value() {
        let err = parse_document(&wrap(
            r#"<TreeModel><Node><True/>
                 <Node><SimplePredicate field="a" operator="equal"/></Node>
               </Node></TreeModel>"#,
        ))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "attribute 'value' is required in 'SimplePredicate'"
        );
    }

    #[test]
    fn test_unknown_operator_surfaces_evaluation_error() {
        let err = parse_document(&wrap(
            r#"<TreeModel><Node><True/>
                 <Node><SimplePredicate field="a" operator="about" value="1"/></Node>
               </Node></TreeModel>"#,
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            PmmlError::Predicate(EvaluationError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn test_operator_names_are_case_insensitive() {
        let pmml = parse_document(&wrap(
            r#"<TreeModel modelName="t"><Node><True/>
                 <Node score="1"><SimplePredicate field="a" operator=" GreaterThan " value="1"/></Node>
               </Node></TreeModel>"#,
        ))
        .unwrap();
        let child = &pmml.get_by_name("t").unwrap().root().children[0];
        assert!(matches!(
            child.predicate,
            Predicate::Simple {
                operator: SimpleOperator::GreaterThan,
                ..
            }
        ));
    }

    #[test]
    fn test_node_without_predicate() {
        let err = parse_document(&wrap(r#"<TreeModel><Node score="x"/></TreeModel>"#)).unwrap_err();
        assert!(matches!(err, PmmlError::MissingPredicate("Node")));
    }

    #[test]
    fn test_invalid_strategy_attribute() {
        let err = parse_document(&wrap(
            r#"<TreeModel noTrueChildStrategy="guess"><Node><True/></Node></TreeModel>"#,
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            PmmlError::InvalidAttribute {
                attribute: "noTrueChildStrategy",
                ..
            }
        ));
    }

    #[test]
    fn test_probability_fallback_and_extensions() {
        let pmml = parse_document(&wrap(
            r#"<TreeModel modelName="t">
                 <Extension name="vendor" value="x"/>
                 <Node id="n" score="a" recordCount="4">
                   <Extension name="note" value="ignored"/>
                   <True/>
                   <ScoreDistribution value="a" recordCount="3" probability="0.75"/>
                   <ScoreDistribution value="b" recordCount="1"/>
                 </Node>
               </TreeModel>"#,
        ))
        .unwrap();
        let root = pmml.get_by_name("t").unwrap().root();
        assert_eq!(root.record_count, Some(4.0));
        assert_eq!(root.score_distributions[0].confidence, Some(0.75));
        assert_eq!(root.score_distributions[1].confidence, None);
    }

    #[test]
    fn test_rejects_non_pmml_root() {
        let err = parse_document("<Model/>").unwrap_err();
        assert!(matches!(err, PmmlError::UnexpectedElement { .. }));
        assert!(matches!(
            parse_document("<PMML>").unwrap_err(),
            PmmlError::Xml(_)
        ));
    }
}
