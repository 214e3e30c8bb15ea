//! The movie model.
//!
//! A [`Movie`] holds one file path and the raw text an [`OutputProvider`]
//! produced for it. Metadata fields are parsed out of that text on first
//! access and memoized; frames are extracted on demand by running ffmpeg
//! again.

pub mod patterns;
mod types;

pub use types::{MovieReport, MovieState, MovieTags};

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use crate::cache::OutputCache;
use crate::error::{CODE_FRAME_TIME_OUT_OF_RANGE, CODE_INVALID_FRAME_NUMBER};
use crate::frame::{round_time, Frame, FrameExtractor, FrameImporter, FrameOptions, ImageImporter};
use crate::provider::{
    FfmpegOutputProvider, OutputProvider, ProviderKind, DEFAULT_FFMPEG_BINARY,
};
use crate::{Error, Result};

/// Memoized metadata. Each cell is filled at most once per [`Movie`].
#[derive(Debug, Default)]
struct Fields {
    duration: OnceCell<f64>,
    frame_rate: OnceCell<f64>,
    frame_count: OnceCell<u64>,
    frame_size: OnceCell<(u32, u32)>,
    pixel_format: OnceCell<String>,
    bit_rate: OnceCell<u64>,
    video_bit_rate: OnceCell<u64>,
    audio_bit_rate: OnceCell<u64>,
    audio_sample_rate: OnceCell<u32>,
    video_codec: OnceCell<String>,
    audio_codec: OnceCell<String>,
    audio_channels: OnceCell<u32>,
    comment: OnceCell<String>,
    title: OnceCell<String>,
    artist: OnceCell<String>,
    copyright: OnceCell<String>,
    genre: OnceCell<String>,
    track_number: OnceCell<u32>,
    year: OnceCell<u32>,
}

/// A movie or audio file described by ffmpeg's diagnostic output.
///
/// # Example
///
/// ```no_run
/// use ffmovie_av::{FrameOptions, Movie};
///
/// let mut movie = Movie::new("/movies/clip.mp4", "/usr/bin/ffmpeg")?;
/// println!("{}x{} @ {} fps", movie.frame_width(), movie.frame_height(), movie.frame_rate());
///
/// let frame = movie.fetch_frame(Some(100), &FrameOptions::new().with_size(320, 180))?;
/// println!("frame at {}s", frame.time());
/// # Ok::<(), ffmovie_av::Error>(())
/// ```
///
/// Cloning copies the provider and the raw text but not the memoized fields;
/// the clone parses again on first access.
#[derive(Debug)]
pub struct Movie {
    binary: PathBuf,
    movie_file: PathBuf,
    provider: Box<dyn OutputProvider>,
    output: String,
    file_size: Option<u64>,
    frame_number: u64,
    temp_dir: Option<PathBuf>,
    fields: Fields,
}

impl Movie {
    /// Probe `path` with `ffmpeg -i`, using `binary` both to probe and to
    /// extract frames.
    pub fn new(path: impl Into<PathBuf>, binary: impl Into<PathBuf>) -> Result<Self> {
        let binary = binary.into();
        let provider = FfmpegOutputProvider::new(binary.clone(), false);
        Self::open_with_binary(path, Box::new(provider), binary)
    }

    /// Describe `path` with `provider`.
    ///
    /// Frames are extracted with the provider's binary when it is an ffmpeg
    /// provider, and with the default ffmpeg location otherwise.
    pub fn open(path: impl Into<PathBuf>, provider: Box<dyn OutputProvider>) -> Result<Self> {
        let binary = match provider.kind() {
            ProviderKind::Ffmpeg => provider.binary().to_path_buf(),
            _ => PathBuf::from(DEFAULT_FFMPEG_BINARY),
        };
        Self::open_with_binary(path, provider, binary)
    }

    /// Describe `path` with `provider`, extracting frames with `binary`.
    pub fn open_with_binary(
        path: impl Into<PathBuf>,
        provider: Box<dyn OutputProvider>,
        binary: impl Into<PathBuf>,
    ) -> Result<Self> {
        let mut movie = Self {
            binary: binary.into(),
            movie_file: path.into(),
            provider: Box::new(FfmpegOutputProvider::default()),
            output: String::new(),
            file_size: None,
            frame_number: 0,
            temp_dir: None,
            fields: Fields::default(),
        };
        movie.set_provider(provider)?;
        Ok(movie)
    }

    /// Root for temporary frame files instead of the system temp directory.
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }

    /// Rebuild a movie from a snapshot. No tool is run; the provider is
    /// reattached to `cache` and every field is parsed afresh.
    pub fn restore(state: MovieState, cache: &OutputCache) -> Self {
        let mut provider = state.provider.into_provider(cache);
        provider.set_movie_file(&state.movie_file);

        Self {
            file_size: file_size_of(&state.movie_file),
            binary: state.binary,
            movie_file: state.movie_file,
            provider,
            output: state.output,
            frame_number: state.frame_number,
            temp_dir: None,
            fields: Fields::default(),
        }
    }

    /// Snapshot of the movie's identity.
    pub fn snapshot(&self) -> MovieState {
        MovieState {
            binary: self.binary.clone(),
            movie_file: self.movie_file.clone(),
            output: self.output.clone(),
            frame_number: self.frame_number,
            provider: self.provider.config(),
        }
    }

    /// Snapshot serialized as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Restore from [`Movie::to_json`] output.
    pub fn from_json(json: &str, cache: &OutputCache) -> Result<Self> {
        let state: MovieState = serde_json::from_str(json)?;
        Ok(Self::restore(state, cache))
    }

    /// Get the current provider.
    pub fn provider(&self) -> &dyn OutputProvider {
        self.provider.as_ref()
    }

    /// Attach a provider and re-read the raw text through it.
    ///
    /// Memoized fields are discarded. On error the movie keeps its previous
    /// provider and text.
    pub fn set_provider(&mut self, mut provider: Box<dyn OutputProvider>) -> Result<()> {
        provider.set_movie_file(&self.movie_file);
        let output = provider.fetch_output()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            movie = %self.movie_file.display(),
            provider = %provider.kind(),
            bytes = output.len(),
            "Attached output provider"
        );

        self.file_size = file_size_of(&self.movie_file);
        self.provider = provider;
        self.output = output;
        self.fields = Fields::default();
        Ok(())
    }

    /// Path of the movie or audio file.
    pub fn filename(&self) -> &Path {
        &self.movie_file
    }

    /// ffmpeg used for frame extraction.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Raw diagnostic text.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn file_size(&self) -> Option<u64> {
        self.file_size
    }

    pub fn set_file_size(&mut self, file_size: u64) {
        self.file_size = Some(file_size);
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        *self
            .fields
            .duration
            .get_or_init(|| patterns::duration(&self.output))
    }

    /// Frame rate in fps.
    pub fn frame_rate(&self) -> f64 {
        *self
            .fields
            .frame_rate
            .get_or_init(|| patterns::frame_rate(&self.output))
    }

    /// Estimated number of frames, `floor(duration * frame_rate)`.
    pub fn frame_count(&self) -> u64 {
        *self
            .fields
            .frame_count
            .get_or_init(|| patterns::frame_count(self.duration(), self.frame_rate()))
    }

    fn frame_size(&self) -> (u32, u32) {
        *self
            .fields
            .frame_size
            .get_or_init(|| patterns::frame_size(&self.output))
    }

    /// Width in pixels.
    pub fn frame_width(&self) -> u32 {
        self.frame_size().0
    }

    /// Height in pixels.
    pub fn frame_height(&self) -> u32 {
        self.frame_size().1
    }

    pub fn pixel_format(&self) -> &str {
        self.fields
            .pixel_format
            .get_or_init(|| patterns::pixel_format(&self.output))
    }

    /// Bit rate of the whole file in bits per second.
    pub fn bit_rate(&self) -> u64 {
        *self
            .fields
            .bit_rate
            .get_or_init(|| patterns::bit_rate(&self.output))
    }

    /// Video bit rate in bits per second. Only constant bit rate streams
    /// report one.
    pub fn video_bit_rate(&self) -> u64 {
        *self
            .fields
            .video_bit_rate
            .get_or_init(|| patterns::video_bit_rate(&self.output))
    }

    /// Audio bit rate in bits per second.
    pub fn audio_bit_rate(&self) -> u64 {
        *self
            .fields
            .audio_bit_rate
            .get_or_init(|| patterns::audio_bit_rate(&self.output))
    }

    /// Audio sample rate in Hz.
    pub fn audio_sample_rate(&self) -> u32 {
        *self
            .fields
            .audio_sample_rate
            .get_or_init(|| patterns::audio_sample_rate(&self.output))
    }

    pub fn video_codec(&self) -> &str {
        self.fields
            .video_codec
            .get_or_init(|| patterns::video_codec(&self.output))
    }

    pub fn audio_codec(&self) -> &str {
        self.fields
            .audio_codec
            .get_or_init(|| patterns::audio_codec(&self.output))
    }

    pub fn audio_channels(&self) -> u32 {
        *self
            .fields
            .audio_channels
            .get_or_init(|| patterns::audio_channels(&self.output))
    }

    /// Rescans the text on every call.
    pub fn has_audio(&self) -> bool {
        patterns::has_audio(&self.output)
    }

    /// Rescans the text on every call.
    pub fn has_video(&self) -> bool {
        patterns::has_video(&self.output)
    }

    pub fn comment(&self) -> &str {
        self.fields
            .comment
            .get_or_init(|| patterns::comment(&self.output))
    }

    pub fn title(&self) -> &str {
        self.fields
            .title
            .get_or_init(|| patterns::title(&self.output))
    }

    /// Artist tag of an audio file, or author of a movie.
    pub fn artist(&self) -> &str {
        self.fields
            .artist
            .get_or_init(|| patterns::artist(&self.output))
    }

    /// Alias for [`Movie::artist`].
    pub fn author(&self) -> &str {
        self.artist()
    }

    pub fn copyright(&self) -> &str {
        self.fields
            .copyright
            .get_or_init(|| patterns::copyright(&self.output))
    }

    pub fn genre(&self) -> &str {
        self.fields
            .genre
            .get_or_init(|| patterns::genre(&self.output))
    }

    pub fn track_number(&self) -> u32 {
        *self
            .fields
            .track_number
            .get_or_init(|| patterns::track_number(&self.output))
    }

    pub fn year(&self) -> u32 {
        *self
            .fields
            .year
            .get_or_init(|| patterns::year(&self.output))
    }

    /// One-based number of the frame the cursor points at.
    pub fn frame_number(&self) -> u64 {
        if self.frame_number == 0 {
            1
        } else {
            self.frame_number
        }
    }

    /// Resolve every field into a serializable report.
    pub fn report(&self) -> MovieReport {
        MovieReport {
            file_path: self.movie_file.clone(),
            file_size: self.file_size,
            duration: self.duration(),
            frame_rate: self.frame_rate(),
            frame_count: self.frame_count(),
            frame_width: self.frame_width(),
            frame_height: self.frame_height(),
            pixel_format: self.pixel_format().to_string(),
            bit_rate: self.bit_rate(),
            video_bit_rate: self.video_bit_rate(),
            audio_bit_rate: self.audio_bit_rate(),
            audio_sample_rate: self.audio_sample_rate(),
            video_codec: self.video_codec().to_string(),
            audio_codec: self.audio_codec().to_string(),
            audio_channels: self.audio_channels(),
            has_audio: self.has_audio(),
            has_video: self.has_video(),
            tags: MovieTags {
                title: self.title().to_string(),
                artist: self.artist().to_string(),
                comment: self.comment().to_string(),
                copyright: self.copyright().to_string(),
                genre: self.genre().to_string(),
                track_number: self.track_number(),
                year: self.year(),
            },
        }
    }

    /// The extractor frame requests go through.
    pub fn extractor(&self) -> FrameExtractor {
        FrameExtractor::new(&self.binary, &self.movie_file).with_temp_dir(self.temp_dir.clone())
    }

    /// Fetch the next frame from the cursor.
    pub fn next_key_frame(&mut self) -> Result<Frame> {
        self.fetch_frame(None, &FrameOptions::default())
    }

    /// Fetch a frame by one-based `index`, or the frame at the cursor when
    /// `index` is `None`.
    pub fn fetch_frame(&mut self, index: Option<u64>, options: &FrameOptions) -> Result<Frame> {
        self.fetch_frame_with(&ImageImporter, index, options)
    }

    /// [`Movie::fetch_frame`] with a custom importer.
    ///
    /// Positions run from 0 to `frame_count` inclusive; the last one maps to
    /// the very end of the movie. Only cursor-driven fetches advance the
    /// cursor, and only when they succeed.
    pub fn fetch_frame_with<I: FrameImporter>(
        &mut self,
        importer: &I,
        index: Option<u64>,
        options: &FrameOptions,
    ) -> Result<I::Frame> {
        let position = match index {
            None => self.frame_number,
            Some(0) => return Err(invalid_frame_number()),
            Some(index) => index - 1,
        };

        let frame_count = self.frame_count();
        if frame_count == 0 || position > frame_count {
            return Err(invalid_frame_number());
        }

        let time = round_time(position as f64 / frame_count as f64 * self.duration());
        let frame = self.fetch_frame_at_time_with(importer, time, options)?;

        if index.is_none() {
            self.frame_number += 1;
        }

        Ok(frame)
    }

    /// Fetch the frame at `seconds`.
    pub fn fetch_frame_at_time(&self, seconds: f64, options: &FrameOptions) -> Result<Frame> {
        self.fetch_frame_at_time_with(&ImageImporter, seconds, options)
    }

    /// [`Movie::fetch_frame_at_time`] with a custom importer.
    pub fn fetch_frame_at_time_with<I: FrameImporter>(
        &self,
        importer: &I,
        seconds: f64,
        options: &FrameOptions,
    ) -> Result<I::Frame> {
        let duration = self.duration();
        if !(seconds >= 0.0 && seconds <= duration) {
            return Err(Error::runtime(
                format!(
                    "Frame time is not in range {}/{} {}",
                    seconds,
                    duration,
                    self.movie_file.display()
                ),
                CODE_FRAME_TIME_OUT_OF_RANGE,
            ));
        }

        self.extractor().extract(importer, seconds, options)
    }
}

impl Clone for Movie {
    fn clone(&self) -> Self {
        Self {
            binary: self.binary.clone(),
            movie_file: self.movie_file.clone(),
            provider: self.provider.box_clone(),
            output: self.output.clone(),
            file_size: self.file_size,
            frame_number: self.frame_number,
            temp_dir: self.temp_dir.clone(),
            fields: Fields::default(),
        }
    }
}

fn invalid_frame_number() -> Error {
    Error::invalid_argument("Invalid frame number", CODE_INVALID_FRAME_NUMBER)
}

fn file_size_of(path: &Path) -> Option<u64> {
    std::fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, LiteralOutputProvider};

    const SAMPLE: &str = "Duration: 00:02:30.50, start: 0.0, bitrate: 500 kb/s\n\
Stream #0:0: Video: h264, yuv420p, 1280x720, 2000 kb/s, 25 fps, 25 tbr\n\
Stream #0:1: Audio: aac, 44100 Hz, stereo, 128 kb/s";

    fn movie(output: &str) -> Movie {
        let provider = LiteralOutputProvider::from_output(output).with_cache(OutputCache::new());
        Movie::open("/movies/sample.mp4", Box::new(provider)).unwrap()
    }

    /// Importer that records the requested time instead of decoding.
    struct TimeOnly;

    impl FrameImporter for TimeOnly {
        type Frame = f64;

        fn import(&self, _path: &Path, time: f64) -> Result<f64> {
            Ok(time)
        }
    }

    #[test]
    fn test_sample_fields() {
        let movie = movie(SAMPLE);
        assert_eq!(movie.duration(), 150.5);
        assert_eq!(movie.bit_rate(), 500_000);
        assert_eq!(movie.frame_width(), 1280);
        assert_eq!(movie.frame_height(), 720);
        assert_eq!(movie.video_bit_rate(), 2_000_000);
        assert_eq!(movie.frame_rate(), 25.0);
        assert_eq!(movie.frame_count(), 3762);
        assert_eq!(movie.audio_sample_rate(), 44100);
        assert_eq!(movie.audio_channels(), 2);
        assert_eq!(movie.audio_bit_rate(), 128_000);
        assert_eq!(movie.video_codec(), "h264");
        assert_eq!(movie.audio_codec(), "aac");
        assert_eq!(movie.pixel_format(), "yuv420p");
        assert!(movie.has_audio());
        assert!(movie.has_video());
    }

    #[test]
    fn test_empty_output_degrades_to_defaults() {
        let movie = movie("");
        assert_eq!(movie.duration(), 0.0);
        assert_eq!(movie.frame_rate(), 0.0);
        assert_eq!(movie.frame_count(), 0);
        assert_eq!((movie.frame_width(), movie.frame_height()), (0, 0));
        assert_eq!(movie.video_codec(), "");
        assert_eq!(movie.title(), "");
        assert_eq!(movie.year(), 0);
        assert!(!movie.has_audio());
        assert!(!movie.has_video());
    }

    #[test]
    fn test_fields_are_memoized() {
        let movie = movie(SAMPLE);
        assert_eq!(movie.duration(), 150.5);
        assert!(movie.fields.duration.get().is_some());
        assert!(movie.fields.title.get().is_none());
        // Same value on repeated reads.
        assert_eq!(movie.duration(), movie.duration());
    }

    #[test]
    fn test_frame_count_resolves_inputs() {
        let movie = movie(SAMPLE);
        assert_eq!(movie.frame_count(), 3762);
        assert_eq!(movie.fields.duration.get(), Some(&150.5));
        assert_eq!(movie.fields.frame_rate.get(), Some(&25.0));
    }

    #[test]
    fn test_frame_number_is_one_based() {
        let mut movie = movie(SAMPLE);
        assert_eq!(movie.frame_number(), 1);
        movie.frame_number = 5;
        assert_eq!(movie.frame_number(), 5);
    }

    #[test]
    fn test_author_aliases_artist() {
        let movie = movie("  author          : Jane Doe\n");
        assert_eq!(movie.author(), "Jane Doe");
        assert_eq!(movie.artist(), "Jane Doe");
    }

    #[test]
    fn test_fetch_frame_out_of_range() {
        let mut movie = movie(SAMPLE);
        let options = FrameOptions::new();

        let err = movie.fetch_frame_with(&TimeOnly, Some(3764), &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.code(), Some(CODE_INVALID_FRAME_NUMBER));

        let err = movie.fetch_frame_with(&TimeOnly, Some(0), &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_fetch_frame_without_frames() {
        let mut movie = movie("Duration: 00:00:10.00");
        let err = movie.fetch_frame_with(&TimeOnly, None, &FrameOptions::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_fetch_frame_at_time_out_of_range() {
        let movie = movie(SAMPLE);
        for seconds in [-0.5, 150.6, f64::NAN] {
            let err = movie
                .fetch_frame_at_time_with(&TimeOnly, seconds, &FrameOptions::new())
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Runtime);
            assert_eq!(err.code(), Some(CODE_FRAME_TIME_OUT_OF_RANGE));
            assert!(err.to_string().contains("/movies/sample.mp4"));
        }
    }

    #[test]
    fn test_clone_resets_memoized_fields() {
        let movie = movie(SAMPLE);
        assert_eq!(movie.duration(), 150.5);

        let clone = movie.clone();
        assert!(clone.fields.duration.get().is_none());
        assert_eq!(clone.duration(), 150.5);
        assert_eq!(clone.output(), movie.output());
        assert_eq!(clone.provider().kind(), ProviderKind::Literal);
    }

    #[test]
    fn test_set_provider_replaces_text() {
        let mut movie = movie(SAMPLE);
        assert_eq!(movie.duration(), 150.5);

        let provider = LiteralOutputProvider::from_output("Duration: 00:00:01.00")
            .with_cache(OutputCache::new());
        movie.set_provider(Box::new(provider)).unwrap();
        assert_eq!(movie.duration(), 1.0);
        assert_eq!(movie.provider().movie_file(), Path::new("/movies/sample.mp4"));
    }

    #[test]
    fn test_failed_set_provider_keeps_state() {
        let mut movie = movie(SAMPLE);
        let err = movie
            .set_provider(Box::new(FfmpegOutputProvider::new("ffmpeg", false)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(movie.duration(), 150.5);
        assert_eq!(movie.provider().kind(), ProviderKind::Literal);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut movie = movie(SAMPLE);
        movie.frame_number = 7;

        let json = movie.to_json().unwrap();
        let restored = Movie::from_json(&json, &OutputCache::new()).unwrap();

        assert_eq!(restored.snapshot(), movie.snapshot());
        assert_eq!(restored.frame_number(), 7);
        assert_eq!(restored.frame_count(), 3762);
        assert_eq!(restored.provider().movie_file(), Path::new("/movies/sample.mp4"));
    }

    #[test]
    fn test_open_picks_extraction_binary() {
        let movie = movie(SAMPLE);
        assert_eq!(movie.binary(), Path::new(DEFAULT_FFMPEG_BINARY));

        let provider = LiteralOutputProvider::from_output(SAMPLE);
        let movie =
            Movie::open_with_binary("/movies/sample.mp4", Box::new(provider), "/opt/ffmpeg")
                .unwrap();
        assert_eq!(movie.binary(), Path::new("/opt/ffmpeg"));
    }

    #[test]
    fn test_report() {
        let report = movie(SAMPLE).report();
        assert_eq!(report.frame_count, 3762);
        assert_eq!(report.resolution_name(), Some("720p"));
        assert_eq!(report.tags, MovieTags::default());
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_output_is_not_imported() {
        use std::cell::Cell;

        // `true` stands in for an ffmpeg that writes nothing.
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("existing.jpg");
        std::fs::write(&out, b"previous frame").unwrap();

        let calls = Cell::new(0);
        struct Counting<'a>(&'a Cell<u32>);
        impl FrameImporter for Counting<'_> {
            type Frame = f64;
            fn import(&self, _path: &Path, time: f64) -> Result<f64> {
                self.0.set(self.0.get() + 1);
                Ok(time)
            }
        }

        let provider = LiteralOutputProvider::from_output(SAMPLE);
        let mut movie =
            Movie::open_with_binary("/movies/sample.mp4", Box::new(provider), "true").unwrap();

        let options = FrameOptions::new().with_output(&out);
        let err = movie
            .fetch_frame_with(&Counting(&calls), None, &options)
            .unwrap_err();

        assert!(matches!(err, Error::FrameNotWritten { .. }));
        assert_eq!(calls.get(), 0);
        assert!(!out.exists());
        assert_eq!(movie.frame_number, 0);
    }
}
