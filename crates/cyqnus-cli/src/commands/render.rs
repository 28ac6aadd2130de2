//! Offline rendering of a note sequence to WAV.

use crate::commands::common::{apply_overrides, load_patch, parse_key_val};
use crate::wav::{WavSpec, write_wav};
use clap::Args;
use cyqnus_core::{ParamStore, SmoothedParam, linear_to_db};
use cyqnus_synth::params::master_gain;
use cyqnus_synth::voice::MAX_NOTE;
use cyqnus_synth::{AudioBuffer, NoteEvent, PARAM_LAYOUT, Synth, TimedEvent};
use std::path::PathBuf;

/// Master gain ramp length.
const GAIN_SMOOTHING_MS: f32 = 50.0;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// MIDI notes (comma-separated, e.g., "60,64,67" for C major)
    #[arg(long, value_delimiter = ',', default_value = "60")]
    notes: Vec<u8>,

    /// Note velocity (0-1)
    #[arg(long, default_value = "0.8")]
    velocity: f32,

    /// How long each note is held, in seconds
    #[arg(long, default_value = "1.0")]
    duration: f32,

    /// Delay between successive note starts, in seconds (0 plays a chord)
    #[arg(long, default_value = "0.0")]
    stagger: f32,

    /// Time rendered after the last note-off, in seconds
    #[arg(long, default_value = "1.0")]
    tail: f32,

    /// Factory patch name or patch file to start from
    #[arg(short, long)]
    patch: Option<String>,

    /// Parameter override as string_id=value (repeatable)
    #[arg(long = "param", value_parser = parse_key_val)]
    params: Vec<(String, String)>,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Frames per processing block
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output channels (1 or 2)
    #[arg(long, default_value = "2")]
    channels: u16,

    /// Bit depth (16, 24 or 32 float)
    #[arg(long, default_value = "32")]
    bits: u16,
}

/// A note event at an absolute frame position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledEvent {
    /// Frame from the start of the render.
    pub frame: usize,
    /// The event.
    pub event: NoteEvent,
}

fn seconds_to_frames(seconds: f32, sample_rate: f32) -> usize {
    (seconds.max(0.0) * sample_rate).round() as usize
}

/// Note-ons `stagger` apart, each released after `duration`.
///
/// Returns the events sorted by frame and the total length including
/// `tail`.
pub fn schedule_notes(
    notes: &[u8],
    velocity: f32,
    duration: f32,
    stagger: f32,
    tail: f32,
    sample_rate: f32,
) -> (Vec<ScheduledEvent>, usize) {
    let hold = seconds_to_frames(duration, sample_rate);
    let step = seconds_to_frames(stagger, sample_rate);

    let mut events = Vec::with_capacity(notes.len() * 2);
    let mut last_off = 0;
    for (i, &note) in notes.iter().enumerate() {
        let on = i * step;
        let off = on + hold;
        events.push(ScheduledEvent {
            frame: on,
            event: NoteEvent::NoteOn { note, velocity },
        });
        events.push(ScheduledEvent {
            frame: off,
            event: NoteEvent::NoteOff {
                note,
                allow_tail_off: true,
            },
        });
        last_off = last_off.max(off);
    }
    events.sort_by_key(|e| e.frame);

    (events, last_off + seconds_to_frames(tail, sample_rate))
}

/// Render `total_frames` of `events` through an 8-voice synth.
///
/// Master gain is read from `store` once per block and ramped over
/// 50 ms. Returns one vector per channel.
pub fn render_events(
    store: &ParamStore,
    events: &[ScheduledEvent],
    total_frames: usize,
    sample_rate: f32,
    block_size: usize,
    channels: usize,
) -> Vec<Vec<f32>> {
    let block_size = block_size.max(1);
    let mut synth = Synth::new(sample_rate);
    let mut gain = SmoothedParam::with_config(master_gain(store), sample_rate, GAIN_SMOOTHING_MS);
    let mut buffer = AudioBuffer::new(channels, block_size);
    let mut block_events = Vec::with_capacity(events.len());
    let mut out = vec![Vec::with_capacity(total_frames); buffer.channels()];

    let mut next = 0;
    let mut start = 0;
    while start < total_frames {
        let frames = block_size.min(total_frames - start);
        if frames != buffer.frames() {
            buffer.resize(frames);
        }
        buffer.clear();

        block_events.clear();
        while next < events.len() && events[next].frame < start + frames {
            let scheduled = events[next];
            block_events.push(TimedEvent {
                offset: scheduled.frame - start,
                event: scheduled.event,
            });
            next += 1;
        }
        synth.render_block(&mut buffer, &block_events, store);

        gain.set_target(master_gain(store));
        for frame in 0..frames {
            buffer.scale_frame(frame, gain.advance());
        }

        for (ch, samples) in out.iter_mut().enumerate() {
            samples.extend_from_slice(buffer.channel(ch));
        }
        start += frames;
    }

    out
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if args.notes.is_empty() {
        anyhow::bail!("No notes given");
    }
    if let Some(bad) = args.notes.iter().find(|&&n| n > MAX_NOTE) {
        anyhow::bail!("Note {} out of range (0-{})", bad, MAX_NOTE);
    }
    if !(1..=2).contains(&args.channels) {
        anyhow::bail!("Channels must be 1 or 2, got {}", args.channels);
    }
    if args.sample_rate == 0 || args.block_size == 0 {
        anyhow::bail!("Sample rate and block size must be positive");
    }
    let spec = WavSpec {
        channels: args.channels,
        sample_rate: args.sample_rate,
        bits_per_sample: args.bits,
    };
    hound::WavSpec::try_from(spec)?;
    for (name, value) in [
        ("duration", args.duration),
        ("stagger", args.stagger),
        ("tail", args.tail),
    ] {
        if !value.is_finite() || value < 0.0 {
            anyhow::bail!("--{} must be a non-negative number of seconds", name);
        }
    }

    let store = ParamStore::new(&PARAM_LAYOUT);
    if let Some(name) = &args.patch {
        let patch = load_patch(name)?;
        patch.apply(&store)?;
        println!("Patch: {}", patch.name);
    }
    apply_overrides(&store, &args.params)?;

    let sample_rate = args.sample_rate as f32;
    let velocity = args.velocity.clamp(0.0, 1.0);
    let (events, total_frames) = schedule_notes(
        &args.notes,
        velocity,
        args.duration,
        args.stagger,
        args.tail,
        sample_rate,
    );

    println!("Rendering {} note(s)...", args.notes.len());
    tracing::info!(
        notes = ?args.notes,
        frames = total_frames,
        sample_rate = args.sample_rate,
        block_size = args.block_size,
        "render"
    );

    let channels = render_events(
        &store,
        &events,
        total_frames,
        sample_rate,
        args.block_size,
        usize::from(args.channels),
    );

    let peak = channels
        .iter()
        .flatten()
        .fold(0.0_f32, |acc, s| acc.max(s.abs()));
    if peak > 1.0 {
        tracing::warn!(peak, "output exceeds full scale, lower master_gain");
    }

    write_wav(&args.output, &channels, spec)?;

    println!(
        "Wrote {} frames ({:.2}s) to {}",
        total_frames,
        total_frames as f32 / sample_rate,
        args.output.display()
    );
    println!("  Peak: {:.1} dBFS", linear_to_db(peak));
    Ok(())
}
