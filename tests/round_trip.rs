use captions_editor::{Endpoint, Opts, ShiftScope, decode, encode};

const SAMPLE: &str = "WEBVTT

1
00:00:01.000 --> 00:00:02.500
Hello there...

2
00:00:03.000 --> 00:00:04.000
<i>Two</i>
lines

3
01:00:00.250 --> 01:00:02.750
Late cue
";

/// Compares cue count, numbers, millisecond-precision timestamps and text.
fn assert_same_track(a: &captions_editor::Captions, b: &captions_editor::Captions) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.cue_number(), y.cue_number());
        assert!((x.start().value() - y.start().value()).abs() <= 0.001);
        assert!((x.end().value() - y.end().value()).abs() <= 0.001);
        assert_eq!(x.text(), y.text());
    }
}

#[test]
fn decoded_file_survives_encode_decode() -> anyhow::Result<()> {
    let opts = Opts::default();
    let captions = decode(SAMPLE, &opts)?;
    assert_eq!(captions.len(), 3);

    let again = decode(&encode(&captions)?, &opts)?;
    assert_same_track(&captions, &again);
    Ok(())
}

#[test]
fn edited_track_survives_encode_decode() -> anyhow::Result<()> {
    let opts = Opts::default();
    let captions = decode(SAMPLE, &opts)?;
    let first = captions.cues()[0].id();
    let second = captions.cues()[1].id();

    let edited = captions
        .insert_after(first)?
        .shift_cascade(second, 0.333, Endpoint::End)?
        .shift_timestamp(first, -0.001, ShiftScope::Both)?
        .set_text(first, "  Edited... text \n")?
        .delete(captions.cues()[2].id())?;

    let numbers: Vec<usize> = edited.iter().map(|c| c.cue_number()).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(edited.cues()[0].text(), "Edited… text");

    let again = decode(&encode(&edited)?, &opts)?;
    assert_same_track(&edited, &again);
    Ok(())
}

#[test]
fn multi_paragraph_text_survives_encode_decode() -> anyhow::Result<()> {
    let opts = Opts::default();
    let captions = decode(SAMPLE, &opts)?;
    let first = captions.cues()[0].id();
    let second = captions.cues()[1].id();

    let edited = captions
        .set_text(first, "first\n\nsecond\n \nthird")?
        .set_text(second, "WebVTT\nis the format")?;
    assert_eq!(edited.cues()[0].text(), "first\nsecond\nthird");
    assert_eq!(edited.cues()[1].text(), "is the format");

    let again = decode(&encode(&edited)?, &opts)?;
    assert_same_track(&edited, &again);
    Ok(())
}

#[test]
fn encoding_is_stable_after_one_round() -> anyhow::Result<()> {
    let opts = Opts::default();
    let once = encode(&decode(SAMPLE, &opts)?)?;
    let twice = encode(&decode(&once, &opts)?)?;
    assert_eq!(once, twice);
    assert!(once.starts_with("WEBVTT\n\n1\n00:00:01.000 --> 00:00:02.500\n"));
    assert!(!once.ends_with('\n'));
    Ok(())
}
