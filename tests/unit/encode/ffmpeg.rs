use super::*;

fn args_as_strings(params: &EncodeParams, dir: &Path) -> Vec<String> {
    params
        .command_args(dir)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn default_params_match_the_reference_time_base() {
    let params = EncodeParams::new(Oversample::DEFAULT, DEFAULT_NATIVE_FPS);
    assert_eq!(params.input_fps, 240.0);
    assert_eq!(params.output_fps, 60);
    assert_eq!(params.size, 512);
    assert_eq!(params.codec, "libx264");
    assert!(params.overwrite);
    params.validate().unwrap();
}

#[test]
fn command_args_are_in_ffmpeg_order() {
    let dir = Path::new("frames");
    let params = EncodeParams::new(Oversample::DEFAULT, 60.0);
    let args = args_as_strings(&params, dir);

    let pattern = dir.join("%d.svg").to_string_lossy().into_owned();
    let out = dir.join("out.mp4").to_string_lossy().into_owned();
    assert_eq!(
        args,
        vec![
            "-y",
            "-loglevel",
            "error",
            "-framerate",
            "240",
            "-start_number",
            "0",
            "-i",
            pattern.as_str(),
            "-r",
            "60",
            "-s",
            "512x512",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            out.as_str(),
        ]
    );
}

#[test]
fn input_rate_follows_the_document_rate() {
    let params = EncodeParams::new(Oversample::DEFAULT, 30.0);
    assert_eq!(params.input_fps, 120.0);
    let args = args_as_strings(&params, Path::new("f"));
    let i = args.iter().position(|a| a == "-framerate").unwrap();
    assert_eq!(args[i + 1], "120");
}

#[test]
fn fractional_rates_are_printed_compactly() {
    assert_eq!(format_rate(240.0), "240");
    assert_eq!(format_rate(119.88), "119.88");
    assert_eq!(format_rate(95.904), "95.904");
}

#[test]
fn no_overwrite_uses_dash_n() {
    let params = EncodeParams {
        overwrite: false,
        ..EncodeParams::new(Oversample::DEFAULT, 60.0)
    };
    assert_eq!(args_as_strings(&params, Path::new("f"))[0], "-n");
}

#[test]
fn validation_catches_bad_values() {
    let base = EncodeParams::new(Oversample::DEFAULT, 60.0);
    for bad in [
        EncodeParams {
            input_fps: 0.0,
            ..base.clone()
        },
        EncodeParams {
            output_fps: 0,
            ..base.clone()
        },
        EncodeParams {
            size: 0,
            ..base.clone()
        },
        EncodeParams {
            size: 511,
            ..base.clone()
        },
        EncodeParams {
            out_file_name: String::new(),
            ..base.clone()
        },
    ] {
        assert!(matches!(bad.validate(), Err(ConvertError::Validation(_))));
    }
}

#[test]
fn missing_program_is_an_encoding_error() {
    let tmp = tempfile::tempdir().unwrap();
    let mut enc = FfmpegEncoder::with_program(tmp.path().join("no-such-ffmpeg"));
    let err = enc
        .encode(tmp.path(), &EncodeParams::new(Oversample::DEFAULT, 60.0))
        .unwrap_err();
    assert!(matches!(err, ConvertError::Encoding(_)));
}
