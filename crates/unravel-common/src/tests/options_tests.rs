use super::*;

#[test]
fn test_default_options() {
    let options = TransformOptions::default();
    assert_eq!(options.string_array_name, "__STRING_ARRAY__");
    assert_eq!(options.max_ast_depth, MAX_AST_DEPTH);
}

#[test]
fn test_from_json_partial() {
    let options = TransformOptions::from_json(r#"{ "stringArrayName": "STRINGS" }"#)
        .expect("valid options");
    assert_eq!(options.string_array_name, "STRINGS");
    assert_eq!(options.max_ast_depth, MAX_AST_DEPTH);
}

#[test]
fn test_from_json_rejects_wrong_type() {
    assert!(TransformOptions::from_json(r#"{ "maxAstDepth": "deep" }"#).is_err());
}
