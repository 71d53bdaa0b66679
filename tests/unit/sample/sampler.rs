use super::*;
use crate::document::loader::AnimationDocument;
use crate::foundation::core::Oversample;

/// Host that records every seek and echoes the last time back as markup.
#[derive(Default)]
struct ScriptedHost {
    seeks: Vec<f64>,
    current: Option<f64>,
    fail_on_seek: Option<usize>,
    cancel_on_fail: Option<CancelToken>,
}

impl RenderHost for ScriptedHost {
    fn seek_and_settle(&mut self, time: SampleTime) -> ConvertResult<()> {
        if self.fail_on_seek == Some(self.seeks.len()) {
            if let Some(token) = &self.cancel_on_fail {
                token.cancel();
            }
            return Err(ConvertError::render("engine exploded"));
        }
        self.seeks.push(time.0);
        self.current = Some(time.0);
        Ok(())
    }

    fn capture_markup(&mut self) -> ConvertResult<String> {
        let t = self
            .current
            .ok_or_else(|| ConvertError::render("capture before seek"))?;
        Ok(format!("<svg data-t=\"{t}\"/>"))
    }
}

fn plan_for(src: &str) -> SamplePlan {
    AnimationDocument::from_slice(src.as_bytes())
        .unwrap()
        .sample_plan(Oversample::DEFAULT)
        .unwrap()
}

#[test]
fn yields_every_index_once_in_order() {
    let mut host = ScriptedHost::default();
    let frames: Vec<RenderedFrame> = FrameSampler::new(
        plan_for(r#"{"ip":0,"op":5}"#),
        &mut host,
        CancelToken::new(),
    )
    .collect::<ConvertResult<_>>()
    .unwrap();

    assert_eq!(frames.len(), 20);
    for (i, f) in frames.iter().enumerate() {
        assert_eq!(f.index, SampleIndex(i as u64));
        assert_eq!(f.time, SampleTime(i as f64 / 4.0));
        assert_eq!(f.markup, format!("<svg data-t=\"{}\"/>", f.time.0));
    }
    assert_eq!(frames[19].time, SampleTime(4.75));
    assert_eq!(host.seeks.len(), 20);
}

#[test]
fn times_start_at_the_in_point() {
    let mut host = ScriptedHost::default();
    let times: Vec<f64> = FrameSampler::new(
        plan_for(r#"{"ip":2,"op":4}"#),
        &mut host,
        CancelToken::new(),
    )
    .map(|f| f.unwrap().time.0)
    .collect();
    assert_eq!(times, vec![2.0, 2.25, 2.5, 2.75, 3.0, 3.25, 3.5, 3.75]);
}

#[test]
fn first_error_ends_the_sequence() {
    let mut host = ScriptedHost {
        fail_on_seek: Some(3),
        ..Default::default()
    };
    let plan = SamplePlan::new(0.0, 2.0, Oversample::DEFAULT).unwrap();
    let mut sampler = FrameSampler::new(plan, &mut host, CancelToken::new());

    for _ in 0..3 {
        assert!(sampler.next().unwrap().is_ok());
    }
    let err = sampler.next().unwrap().unwrap_err();
    assert!(matches!(err, ConvertError::Render(_)));
    assert_eq!(sampler.completed(), 3);
    assert!(sampler.next().is_none());
    assert!(sampler.next().is_none());
}

#[test]
fn cancellation_is_checked_before_each_seek() {
    let mut host = ScriptedHost::default();
    let cancel = CancelToken::new();
    let plan = SamplePlan::new(0.0, 4.0, Oversample::DEFAULT).unwrap();
    let mut sampler = FrameSampler::new(plan, &mut host, cancel.clone());

    assert!(sampler.next().unwrap().is_ok());
    assert!(sampler.next().unwrap().is_ok());
    cancel.cancel();
    let err = sampler.next().unwrap().unwrap_err();
    assert!(matches!(err, ConvertError::Cancelled { completed: 2 }));
    assert!(sampler.next().is_none());
    drop(sampler);
    assert_eq!(host.seeks.len(), 2);
}

#[test]
fn failure_during_an_interrupt_reports_cancellation() {
    let cancel = CancelToken::new();
    let mut host = ScriptedHost {
        fail_on_seek: Some(2),
        cancel_on_fail: Some(cancel.clone()),
        ..Default::default()
    };
    let plan = SamplePlan::new(0.0, 2.0, Oversample::DEFAULT).unwrap();
    let mut sampler = FrameSampler::new(plan, &mut host, cancel);

    assert!(sampler.next().unwrap().is_ok());
    assert!(sampler.next().unwrap().is_ok());
    let err = sampler.next().unwrap().unwrap_err();
    assert!(matches!(err, ConvertError::Cancelled { completed: 2 }));
    assert_eq!(err.exit_code(), 130);
    assert!(sampler.next().is_none());
}

#[test]
fn size_hint_bounds_remaining_samples() {
    let mut host = ScriptedHost::default();
    let plan = SamplePlan::new(0.0, 1.0, Oversample::DEFAULT).unwrap();
    let mut sampler = FrameSampler::new(plan, &mut host, CancelToken::new());
    assert_eq!(sampler.size_hint(), (0, Some(4)));
    sampler.next();
    assert_eq!(sampler.size_hint(), (0, Some(3)));
}
