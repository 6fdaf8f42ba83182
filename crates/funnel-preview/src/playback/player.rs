use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use super::poll::PlaybackClock;

impl PlaybackClock for Sink {
    fn position(&self) -> Duration {
        self.get_pos()
    }

    fn finished(&self) -> bool {
        self.empty()
    }
}

/// Plays one module track at a time on the default output device.
pub struct AudioPlayer {
    stream: OutputStream,
    sink: Option<Arc<Sink>>,
}

impl AudioPlayer {
    pub fn open() -> Result<Self> {
        let mut stream =
            OutputStreamBuilder::open_default_stream().context("No audio output device")?;
        stream.log_on_drop(false);
        Ok(Self { stream, sink: None })
    }

    /// Replace whatever is playing with the given encoded track. Returns the
    /// sink as the clock for the polling task.
    pub fn play(&mut self, bytes: Vec<u8>) -> Result<Arc<Sink>> {
        self.stop();
        let source = Decoder::new(Cursor::new(bytes)).context("Failed to decode audio")?;
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.play();
        let sink = Arc::new(sink);
        self.sink = Some(Arc::clone(&sink));
        tracing::debug!("Audio track started");
        Ok(sink)
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
