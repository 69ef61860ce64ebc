use super::clip::AudioClip;
use rubato::{FftFixedIn, Resampler};
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Input frames handed to the resampler per call
const RESAMPLE_CHUNK: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("resample error: {0}")]
    Resample(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Decode an encoded audio payload (MP3, WAV) into a mono clip.
///
/// `extension` is only a probing hint; the container is detected from the
/// bytes. Multi-channel audio is averaged down to one channel.
pub fn decode(bytes: &[u8], extension: Option<&str>) -> Result<AudioClip, AudioError> {
    if bytes.is_empty() {
        return Err(AudioError::Decode("empty audio payload".to_string()));
    }

    let source = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(source), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::Decode(format!("unrecognised audio format: {}", e)))?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::Decode("no audio track found".to_string()))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Decode(format!("unsupported codec: {}", e)))?;

    let mut pcm = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count().max(1);
                sample_rate.get_or_insert(spec.rate);

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);

                for frame in buffer.samples().chunks(channels) {
                    pcm.push(frame.iter().sum::<f32>() / channels as f32);
                }
            }
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping undecodable audio packet");
                continue;
            }
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        }
    }

    let sample_rate =
        sample_rate.ok_or_else(|| AudioError::Decode("unknown sample rate".to_string()))?;
    if pcm.is_empty() {
        return Err(AudioError::Decode("payload contained no samples".to_string()));
    }

    tracing::debug!(
        samples = pcm.len(),
        sample_rate = sample_rate,
        "Audio decoded"
    );

    Ok(AudioClip::new(pcm, sample_rate))
}

/// Decode an audio file from disk, using its extension as the probe hint.
pub fn decode_file(path: &Path) -> Result<AudioClip, AudioError> {
    let bytes = std::fs::read(path)?;
    let extension = path.extension().and_then(|ext| ext.to_str());
    decode(&bytes, extension)
}

/// Convert `clip` to `target_rate`, keeping its duration.
pub fn resample(clip: AudioClip, target_rate: u32) -> Result<AudioClip, AudioError> {
    if clip.sample_rate == target_rate {
        return Ok(clip);
    }
    if clip.sample_rate == 0 || target_rate == 0 {
        return Err(AudioError::Resample(format!(
            "invalid sample rates {} -> {}",
            clip.sample_rate, target_rate
        )));
    }
    if clip.is_empty() {
        return Ok(AudioClip::empty(target_rate));
    }

    let expected =
        (clip.samples.len() as u64 * target_rate as u64 / clip.sample_rate as u64) as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        clip.sample_rate as usize,
        target_rate as usize,
        RESAMPLE_CHUNK,
        2,
        1,
    )
    .map_err(|e| AudioError::Resample(e.to_string()))?;

    // The resampler emits `delay` frames of filter lead-in before the first
    // real sample; zero chunks are fed until the tail has been flushed past it.
    let delay = resampler.output_delay();
    let wanted = delay + expected;

    let mut output = Vec::with_capacity(wanted + RESAMPLE_CHUNK);
    let mut chunks = clip.samples.chunks(RESAMPLE_CHUNK);
    while output.len() < wanted {
        let mut chunk = chunks.next().map(<[f32]>::to_vec).unwrap_or_default();
        chunk.resize(RESAMPLE_CHUNK, 0.0);
        let waves_out = resampler
            .process(&[chunk], None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        output.extend_from_slice(&waves_out[0]);
    }
    output.drain(..delay);
    output.truncate(expected);

    Ok(AudioClip::new(output, target_rate))
}

fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Write `clip` as a 16-bit PCM mono WAV file.
pub fn encode_wav_file(clip: &AudioClip, path: &Path) -> Result<(), AudioError> {
    let mut writer = hound::WavWriter::create(path, wav_spec(clip.sample_rate))
        .map_err(|e| AudioError::Encode(format!("cannot create {}: {}", path.display(), e)))?;
    for &sample in &clip.samples {
        writer
            .write_sample(to_i16(sample))
            .map_err(|e| AudioError::Encode(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| AudioError::Encode(e.to_string()))?;
    Ok(())
}

/// Encode `clip` as an in-memory 16-bit PCM mono WAV payload.
pub fn encode_wav_bytes(clip: &AudioClip) -> Result<Vec<u8>, AudioError> {
    let mut bytes = Vec::new();
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), wav_spec(clip.sample_rate))
            .map_err(|e| AudioError::Encode(e.to_string()))?;
        for &sample in &clip.samples {
            writer
                .write_sample(to_i16(sample))
                .map_err(|e| AudioError::Encode(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioError::Encode(e.to_string()))?;
    }
    Ok(bytes)
}
