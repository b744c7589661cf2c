//! Command-line speech engine
//!
//! Drives an eSpeak-compatible synthesizer (`espeak-ng`, `espeak`) as a
//! child process. Voices are discovered once with `--voices`; each utterance
//! spawns one process, and `cancel` kills the one currently speaking.

use crate::speech::engine::{SpeechEngine, Utterance, Voice};
use crate::speech::error::SpeechError;
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::{oneshot, watch};
use tracing::{debug, error, info, warn};

/// eSpeak's default speaking rate in words per minute
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// eSpeak's default pitch on its 0-99 scale
const BASE_PITCH: f32 = 50.0;

/// Speech engine backed by an external synthesizer process
pub struct CommandSpeechEngine {
    command: String,
    voices: Mutex<Vec<Voice>>,
    ready: watch::Sender<bool>,
    current: Mutex<Option<oneshot::Sender<()>>>,
}

impl CommandSpeechEngine {
    /// Create an engine for `command`; call [`CommandSpeechEngine::discover_voices`] to load voices
    pub fn new(command: impl Into<String>) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            command: command.into(),
            voices: Mutex::new(Vec::new()),
            ready,
            current: Mutex::new(None),
        }
    }

    /// Synthesizer executable
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Query the synthesizer for its voices and mark the list ready
    ///
    /// The list is marked ready even when the query fails, so announcements
    /// fall back to the synthesizer's default voice instead of waiting forever.
    pub async fn discover_voices(&self) {
        match self.query_voices().await {
            Ok(voices) => {
                info!(
                    command = %self.command,
                    count = voices.len(),
                    "Speech voices loaded"
                );
                if let Ok(mut guard) = self.voices.lock() {
                    *guard = voices;
                }
            }
            Err(e) => {
                warn!(command = %self.command, error = %e, "Voice discovery failed");
            }
        }
        self.ready.send_replace(true);
    }

    async fn query_voices(&self) -> Result<Vec<Voice>, SpeechError> {
        let output = Command::new(&self.command)
            .arg("--voices")
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::Failed(format!(
                "'{} --voices' exited with code {}: {}",
                self.command,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn build_command(&self, utterance: &Utterance) -> Command {
        let voice = utterance
            .voice
            .as_ref()
            .map(|v| v.name.clone())
            .unwrap_or_else(|| primary_language(&utterance.lang).to_ascii_lowercase());

        let mut cmd = Command::new(&self.command);
        cmd.arg("-v")
            .arg(voice)
            .arg("-s")
            .arg(words_per_minute(utterance.rate).to_string())
            .arg("-p")
            .arg(espeak_pitch(utterance.pitch).to_string())
            .arg("--")
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeechEngine {
    fn list_voices(&self) -> Vec<Voice> {
        self.voices
            .lock()
            .map(|voices| voices.clone())
            .unwrap_or_default()
    }

    async fn voices_ready(&self) {
        let mut rx = self.ready.subscribe();
        let _ = rx.wait_for(|ready| *ready).await;
    }

    fn cancel(&self) {
        let previous = self.current.lock().ok().and_then(|mut guard| guard.take());
        if let Some(stop) = previous {
            debug!("Cancelling current utterance");
            let _ = stop.send(());
        }
    }

    fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        let mut child = self.build_command(&utterance).spawn()?;
        let (stop_tx, stop_rx) = oneshot::channel();

        let superseded = self
            .current
            .lock()
            .map_err(|_| SpeechError::Failed("utterance slot poisoned".to_string()))?
            .replace(stop_tx);
        if let Some(stop) = superseded {
            let _ = stop.send(());
        }

        debug!(pid = ?child.id(), lang = %utterance.lang, "Synthesizer spawned");

        let stderr = child.stderr.take();
        tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => match status {
                    Ok(status) if !status.success() => {
                        let stderr = read_stderr(stderr).await;
                        error!(
                            exit_code = status.code().unwrap_or(-1),
                            stderr = %stderr,
                            "Synthesizer exited with failure"
                        );
                    }
                    Ok(_) => debug!("Utterance finished"),
                    Err(e) => error!(error = %e, "Failed to wait for synthesizer"),
                },
                _ = stop_rx => {
                    if let Err(e) = child.kill().await {
                        warn!(error = %e, "Failed to stop synthesizer");
                    }
                }
            }
        });

        Ok(())
    }
}

/// Parse `espeak --voices` output
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
///  5  ar              --/M      Arabic             sem/ar
/// ```
pub fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let _priority = fields.next()?;
            let lang = fields.next()?;
            let _age_gender = fields.next()?;
            let name = fields.next()?;
            Some(Voice::new(name, lang))
        })
        .collect()
}

/// Collect whatever the synthesizer wrote to stderr, trimmed
async fn read_stderr<R: AsyncRead + Unpin>(stderr: Option<R>) -> String {
    let Some(mut stderr) = stderr else {
        return String::new();
    };
    let mut buf = Vec::new();
    if let Err(e) = stderr.read_to_end(&mut buf).await {
        warn!(error = %e, "Failed to read synthesizer stderr");
    }
    String::from_utf8_lossy(&buf).trim().to_string()
}

fn primary_language(lang: &str) -> &str {
    lang.split(|c: char| c == '-' || c == '_')
        .next()
        .unwrap_or(lang)
}

fn words_per_minute(rate: f32) -> u32 {
    (BASE_WORDS_PER_MINUTE * rate).round().clamp(80.0, 450.0) as u32
}

fn espeak_pitch(pitch: f32) -> u32 {
    (BASE_PITCH * pitch).round().clamp(0.0, 99.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOICES_OUTPUT: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  ar              --/M      Arabic             sem/ar
 2  en-gb           --/M      English_(Great_Britain) gmw/en            (en 2)
 2  en-us           --/M      English_(America)  gmw/en-US            (en 3)
";

    #[test]
    fn test_parse_voice_list() {
        let voices = parse_voice_list(VOICES_OUTPUT);
        assert_eq!(voices.len(), 4);
        assert_eq!(voices[1], Voice::new("Arabic", "ar"));
        assert_eq!(voices[3], Voice::new("English_(America)", "en-us"));
    }

    #[test]
    fn test_parse_voice_list_without_header() {
        assert!(parse_voice_list("espeak: command not found").is_empty());
        assert!(parse_voice_list("").is_empty());
    }

    #[test]
    fn test_rate_and_pitch_mapping() {
        assert_eq!(words_per_minute(1.0), 175);
        assert_eq!(words_per_minute(0.1), 80);
        assert_eq!(espeak_pitch(1.0), 50);
        assert_eq!(espeak_pitch(0.9), 45);
        assert_eq!(espeak_pitch(2.0), 99);
    }

    #[test]
    fn test_primary_language() {
        assert_eq!(primary_language("ar-SA"), "ar");
        assert_eq!(primary_language("en_US"), "en");
        assert_eq!(primary_language("fr"), "fr");
    }

    #[test]
    fn test_build_command_uses_language_without_voice() {
        let engine = CommandSpeechEngine::new("espeak-ng");
        let utterance = Utterance {
            text: "-dash first".to_string(),
            lang: "ar-SA".to_string(),
            voice: None,
            rate: 1.0,
            pitch: 0.9,
        };
        let cmd = engine.build_command(&utterance);
        let args: Vec<_> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, vec!["-v", "ar", "-s", "175", "-p", "45", "--", "-dash first"]);
    }

    #[tokio::test]
    async fn test_missing_command_still_becomes_ready() {
        let engine = CommandSpeechEngine::new("definitely-not-a-synthesizer-binary");
        engine.discover_voices().await;
        engine.voices_ready().await;
        assert!(engine.list_voices().is_empty());
    }

    #[tokio::test]
    async fn test_speak_missing_command_fails() {
        let engine = CommandSpeechEngine::new("definitely-not-a-synthesizer-binary");
        let utterance = Utterance {
            text: "hello".to_string(),
            lang: "en-US".to_string(),
            voice: None,
            rate: 1.0,
            pitch: 1.0,
        };
        assert!(matches!(engine.speak(utterance), Err(SpeechError::Spawn(_))));
        engine.cancel();
    }

    #[tokio::test]
    async fn test_read_stderr_collects_output() {
        let output: &[u8] = b"  espeak-ng: voice 'xx' not found\n";
        assert_eq!(
            read_stderr(Some(output)).await,
            "espeak-ng: voice 'xx' not found"
        );
        assert_eq!(read_stderr(None::<&[u8]>).await, "");
    }

    #[tokio::test]
    async fn test_failed_child_stderr_is_read() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg("echo 'unknown voice' >&2; exit 3")
            .stderr(Stdio::piped());
        let mut child = cmd.spawn().unwrap();
        let stderr = child.stderr.take();

        let status = child.wait().await.unwrap();
        assert_eq!(status.code(), Some(3));
        assert_eq!(read_stderr(stderr).await, "unknown voice");
    }
}
