#[test]
fn version_matches_manifest() {
    assert_eq!(systract_core::version(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn registry_covers_the_x86_64_table() {
    let registry = systract_core::registry::SyscallRegistry::x86_64();
    assert_eq!(registry.len(), 383);
    assert_eq!(registry.name_for(59), Some("execve"));
    // 547 is the x32 alias of pwritev2; name lookups resolve it, id lookups give the native id.
    assert_eq!(registry.id_for("pwritev2"), Some(328));
    assert_eq!(registry.name_for(547), Some("pwritev2"));
}
