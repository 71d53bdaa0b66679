use super::*;

#[test]
fn mount_script_configures_a_paused_svg_player() {
    let doc = AnimationDocument::from_slice(br#"{"ip":0,"op":10,"nm":"it's"}"#).unwrap();
    let js = mount_script(&doc).unwrap();
    assert!(js.contains("renderer: 'svg'"));
    assert!(js.contains("loop: false"));
    assert!(js.contains("autoplay: false"));
    assert!(js.contains("container.id = 'animation'"));
    assert!(js.contains(r#""op":10"#));
    assert!(js.contains("setSubframe(true)"));
}

#[test]
fn seek_script_uses_frame_units_and_redraws() {
    let js = seek_script(4.75);
    assert!(js.contains("goToAndStop(4.75, true)"));
    assert!(js.contains("renderFrame()"));
    assert!(seek_script(0.0).contains("goToAndStop(0, true)"));
}

#[test]
fn capture_reads_the_container() {
    assert_eq!(
        capture_script(),
        "document.getElementById('animation').innerHTML"
    );
}

#[test]
fn library_from_missing_path_is_a_render_error() {
    let err = PlaybackLibrary::from_path("no/such/lottie_svg.min.js").unwrap_err();
    assert!(matches!(err, ConvertError::Render(_)));
}

#[test]
fn library_from_source_has_no_origin() {
    let lib = PlaybackLibrary::from_source("window.lottie = {};");
    assert_eq!(lib.source(), "window.lottie = {};");
    assert!(lib.origin().is_none());
}
