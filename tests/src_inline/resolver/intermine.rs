use super::*;

const MODEL_JSON: &str = r#"{
  "model": {
    "name": "genomic",
    "classes": {
      "BioEntity": {
        "attributes": {
          "primaryIdentifier": {"type": "java.lang.String"},
          "secondaryIdentifier": {"type": "java.lang.String"},
          "symbol": {"type": "java.lang.String"}
        },
        "references": {
          "organism": {"referencedType": "Organism"}
        },
        "collections": {
          "synonyms": {"referencedType": "Synonym"}
        }
      },
      "Gene": {
        "extends": ["SequenceFeature"],
        "collections": {
          "interactions": {"referencedType": "Interaction"}
        }
      },
      "SequenceFeature": {"extends": ["BioEntity"]},
      "Organism": {"attributes": {"name": {"type": "java.lang.String"}}},
      "Synonym": {"attributes": {"value": {"type": "java.lang.String"}}},
      "Interaction": {
        "references": {
          "details": {"referencedType": "InteractionDetail"},
          "participant2": {"referencedType": "Gene"}
        }
      },
      "InteractionDetail": {"attributes": {"type": {"type": "java.lang.String"}}}
    }
  }
}"#;

fn model() -> DataModel {
    let envelope: ModelEnvelope = serde_json::from_str(MODEL_JSON).expect("model json");
    envelope.model
}

#[test]
fn resolves_inherited_attributes() {
    let model = model();
    assert!(model.has_path("Gene", "primaryIdentifier"));
    assert!(model.has_path("Gene", "symbol"));
    assert!(model.has_path("Gene", "organism.name"));
    assert!(model.has_path("Gene", "synonyms.value"));
}

#[test]
fn resolves_interaction_paths() {
    let model = model();
    for field in crate::resolver::INTERACTION_FIELDS {
        assert!(model.has_path("Gene", field), "{field}");
    }
}

#[test]
fn rejects_unknown_and_partial_paths() {
    let model = model();
    assert!(!model.has_path("Gene", "length"));
    assert!(!model.has_path("Gene", "synonyms"));
    assert!(!model.has_path("Gene", "symbol.value"));
    assert!(!model.has_path("Protein", "symbol"));
}

#[test]
fn model_without_interactions_rejects_interaction_paths() {
    let mut model = model();
    if let Some(gene) = model.classes.get_mut("Gene") {
        gene.collections.clear();
    }
    assert!(!model.has_path("Gene", "interactions.details.type"));
    assert!(model.has_path("Gene", "symbol"));
}

#[test]
fn query_lists_view_and_constraints() {
    let ids = vec!["d".to_string(), "e".to_string()];
    let xml = query_xml(&ids, Organism::DrosophilaMelanogaster, &["symbol", "primaryIdentifier"]);
    assert!(xml.contains("view=\"Gene.symbol Gene.primaryIdentifier\""));
    assert!(xml.contains("op=\"LOOKUP\" value=\"d,e\" code=\"A\""));
    assert!(xml.contains(
        "path=\"Gene.organism.name\" op=\"=\" value=\"Drosophila melanogaster\" code=\"B\""
    ));
    assert!(xml.contains("constraintLogic=\"A and B\""));
}

#[test]
fn query_escapes_identifiers() {
    let ids = vec!["a<b>&\"c\"".to_string()];
    let xml = query_xml(&ids, Organism::HomoSapiens, &["symbol"]);
    assert!(xml.contains("value=\"a&lt;b&gt;&amp;&quot;c&quot;\""));
}

#[test]
fn null_cells_become_empty() {
    assert_eq!(cell_to_string(Value::Null), "");
    assert_eq!(cell_to_string(Value::String("abc".into())), "abc");
    assert_eq!(cell_to_string(serde_json::json!(42)), "42");
}

#[test]
fn endpoint_overrides_default() {
    let config: ServiceConfig = toml::from_str(
        r#"
timeout_secs = 5

[endpoints]
"Danio rerio" = "http://localhost:8080/service"
"#,
    )
    .expect("config");
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(
        config.endpoint(Organism::DanioRerio),
        "http://localhost:8080/service"
    );
    assert_eq!(
        config.endpoint(Organism::MusMusculus),
        Organism::MusMusculus.service_url()
    );
    assert_eq!(ServiceConfig::default().timeout_secs, DEFAULT_TIMEOUT_SECS);
}

#[test]
fn empty_batch_fails_before_any_request() {
    let client = InterMineClient::new(ServiceConfig::default()).expect("client");
    let err = client
        .resolve(&[], Organism::DrosophilaMelanogaster, &["symbol"])
        .expect_err("empty");
    assert!(matches!(err, ResolveError::EmptyBatch));
}

fn envelope(json: &str) -> ResultsEnvelope {
    serde_json::from_str(json).expect("envelope")
}

#[test]
fn decodes_rows_in_field_order() {
    let body = envelope(r#"{"results": [["abc", "CG1", null], ["d", "CG2", "FBgn2"]]}"#);
    let rows = decode_results(200, body, 3).expect("rows");
    assert_eq!(rows[0], ["abc", "CG1", ""]);
    assert_eq!(rows[1], ["d", "CG2", "FBgn2"]);
}

#[test]
fn empty_results_are_not_an_error() {
    let rows = decode_results(200, envelope(r#"{"results": []}"#), 2).expect("rows");
    assert!(rows.is_empty());
}

#[test]
fn error_envelope_becomes_service_error() {
    let body = envelope(r#"{"error": "Gene.length is not valid", "results": []}"#);
    let err = decode_results(200, body, 1).expect_err("service");
    assert!(matches!(
        err,
        ResolveError::Service { status: 200, message } if message == "Gene.length is not valid"
    ));
}

#[test]
fn failed_status_without_message_is_service_error() {
    let err = decode_results(500, envelope("{}"), 1).expect_err("service");
    assert!(!err.is_model_failure());
    assert!(matches!(
        err,
        ResolveError::Service { status: 500, message } if message == "query failed"
    ));
}

#[test]
fn short_rows_are_rejected() {
    let body = envelope(r#"{"results": [["abc", "CG1"]]}"#);
    let err = decode_results(200, body, 3).expect_err("width");
    assert!(matches!(err, ResolveError::Decode(msg) if msg.contains("expected 3 cells")));
}
