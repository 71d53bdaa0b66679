use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ConvertError::not_found("a.json", "x")
            .to_string()
            .contains("input not found 'a.json'")
    );
    assert!(
        ConvertError::malformed("x")
            .to_string()
            .contains("malformed document:")
    );
    assert!(ConvertError::render("x").to_string().contains("render error:"));
    assert!(
        ConvertError::write("out/0.svg", "x")
            .to_string()
            .contains("write error 'out/0.svg'")
    );
    assert!(
        ConvertError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        ConvertError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert_eq!(
        ConvertError::Cancelled { completed: 3 }.to_string(),
        "cancelled after 3 frame(s)"
    );
}

#[test]
fn exit_codes_are_distinct_per_kind() {
    let codes = [
        ConvertError::not_found("a", "x").exit_code(),
        ConvertError::malformed("x").exit_code(),
        ConvertError::render("x").exit_code(),
        ConvertError::write("a", "x").exit_code(),
        ConvertError::encoding("x").exit_code(),
        ConvertError::validation("x").exit_code(),
        ConvertError::Cancelled { completed: 0 }.exit_code(),
        ConvertError::Other(anyhow::anyhow!("x")).exit_code(),
    ];
    for (i, a) in codes.iter().enumerate() {
        assert_ne!(*a, 0);
        assert_ne!(*a, 2);
        for b in &codes[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ConvertError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
