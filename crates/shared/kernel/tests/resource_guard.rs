use atelier_kernel::security::resource::ResourceGuard;

#[test]
fn resource_guard_validates_and_prefixes() {
    assert_eq!(ResourceGuard::verify("lead:123", "lead").unwrap(), "lead:123");

    assert_eq!(ResourceGuard::verify("123", "lead").unwrap(), "lead:123");

    assert!(ResourceGuard::verify("user:123", "lead").is_err());
}
