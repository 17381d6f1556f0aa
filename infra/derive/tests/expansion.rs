#[test]
fn expansions_compile_and_run() {
    let cases = trybuild::TestCases::new();
    cases.pass("tests/ui/atelier_error_pass.rs");
    cases.pass("tests/ui/api_model_pass.rs");
}
