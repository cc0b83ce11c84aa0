use serde_json::json;

use super::*;

#[test]
fn route_path_accepts_short_and_full_forms() {
    assert_eq!(route_path("converters/caesar").unwrap(), "/api/converters/caesar");
    assert_eq!(route_path("/api/web-tools/api-tester").unwrap(), "/api/web-tools/api-tester");
    assert_eq!(route_path("api/color/convert/").unwrap(), "/api/color/convert");
}

#[test]
fn route_path_rejects_malformed_routes() {
    assert!(matches!(route_path("caesar"), Err(CliError::InvalidRoute(_))));
    assert!(matches!(route_path("a/b/c"), Err(CliError::InvalidRoute(_))));
    assert!(matches!(route_path("converters/../x"), Err(CliError::InvalidRoute(_))));
}

#[test]
fn error_message_prefers_envelope_fields() {
    let envelope = json!({ "success": false, "error": "missing required field: text", "code": "E_MISSING_FIELD" });
    assert_eq!(error_message(&envelope, ""), "missing required field: text (E_MISSING_FIELD)");
    assert_eq!(error_message(&Value::Null, "Bad Gateway"), "Bad Gateway");
    assert_eq!(error_message(&Value::Null, ""), "empty response");
}

#[test]
fn cli_parses_caesar_shortcut() {
    let cli = Cli::try_parse_from(["toolbench-cli", "caesar", "hello", "--shift", "5"]).unwrap();
    assert!(matches!(cli.command, Command::Caesar { shift: 5, decode: false, brute_force: false, .. }));
    assert!(Cli::try_parse_from(["toolbench-cli", "caesar", "x", "--shift", "2", "--brute-force"]).is_err());
}
