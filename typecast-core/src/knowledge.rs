//! Static reference material about the Typecast API, served to MCP clients
//! through `get_typecast_knowledge` and, in short form, as server instructions.

use std::fmt::Write;

use crate::speech::params::{MAX_INTENSITY, MAX_TEXT_CHARS, MIN_INTENSITY};
use crate::voice::capabilities::all_capabilities;

/// Server instructions sent during MCP initialization
pub const INSTRUCTIONS: &str = "Typecast text-to-speech. Call get_voices to find a voice_id, \
then text_to_speech to synthesize audio into the output directory and play_audio to listen to \
it. Smart emotion and the whisper/toneup/tonedown presets need model ssfm-v30. Call \
get_typecast_knowledge for API details, error codes and examples.";

const OVERVIEW: &str = r#"# Typecast Text-to-Speech API

Typecast converts text into expressive speech using a catalogue of character
voices. Speech is generated by SSFM (Speech Synthesis Foundation Model).

## Answering with this reference

**Always reply in the language the user writes in.** A question in Korean
gets a Korean answer, a question in English an English one, for the whole
conversation.

1. Point to the latest documentation at https://typecast.ai/docs/overview.
2. Say "verification needed" for anything this reference does not settle,
   and point to the support channels below.
3. Ask which programming language the user prefers before writing code.
4. For an error, read the status code and body first, then use the error
   table below.
5. Send Enterprise, volume pricing and other business questions to sales.
6. Explain that legacy Starter API keys and current API keys are different
   keys; the old ones fail with 403.
7. Any character can speak any supported language, so an English character
   can read Korean text.

## Authentication

Every request carries the API key in a header:

```
X-API-KEY: <your key>
```

Keys are issued at https://typecast.ai/developers/api under **API Keys**. API
plans are separate from the Typecast web-service plans. Keep the key on the
server side; never ship it inside client code.

## Endpoints

Base URL: `https://api.typecast.ai`

| Method | Path | Purpose |
|--------|------|---------|
| GET | `/v2/voices` | List voices. Optional query filters: `model`, `gender`, `age` |
| GET | `/v2/voices/{voice_id}` | Details of one voice |
| POST | `/v1/text-to-speech` | Synthesize speech; the response body is the audio |

## Text-to-speech parameters
"#;

const ERRORS: &str = r#"
## Error codes

| Status | Meaning | What to check |
|--------|---------|---------------|
| 400 | Bad request | `voice_id`, `text` and `model` are present and well formed |
| 401 | Unauthorized | The API key is set and has no stray whitespace |
| 402 | Payment required | The plan has credits left |
| 403 | Forbidden | See the checklist below |
| 404 | Not found | The `voice_id` exists (see `get_voices` or `GET /v2/voices`) |
| 422 | Validation error | Parameter ranges listed above, and model support for the emotion |
| 429 | Too many requests | Concurrent request limit of the plan: Free 2, Lite 5, Plus 15 |
| 500 | Server error | Retry later; contact support if it persists |

### 403 checklist

1. A legacy Starter plan key is used with the current API. Issue a new key.
2. The account is dormant. Log in to the website once to reactivate it.
3. The key was copied with whitespace or a newline. Copy it exactly.
"#;

const FAQ: &str = r#"
## FAQ

**Q1. Where do I get an API key?**
Log in at https://typecast.ai/developers/api and open the **API Keys** tab.
A key is issued when you subscribe to the free trial or a paid API plan.

**Q2. My web plan (Pro or Business) is active. Can I call the API?**
No. Web plans and API plans are billed separately; the API needs its own
plan.

**Q3. Is SSML supported?**
No. Use `output.audio_tempo`, `output.volume` and `output.audio_pitch`.

**Q4. Is there a pronunciation dictionary?**
Not through the API.

**Q5. Can I call the API from AWS Lambda or another serverless runtime?**
Yes. Any HTTPS client works; see the direct API examples below.

**Q6. Can I call the API from a mobile app?**
Only through your own backend. Never ship the API key inside client code.

**Q7. Why do I get 403?**
Work through the 403 checklist above.

**Q8. Why do I get 429?**
The plan's concurrent request limit was exceeded (Free 2, Lite 5, Plus 15).
Space the requests out or move to a larger plan.
"#;

const EXAMPLES: &str = r#"
## Notes

- SSML is not supported. Use `audio_tempo`, `audio_pitch` and `volume` instead.
- The same `seed` with identical parameters reproduces the same audio.
- The response body of `/v1/text-to-speech` is the audio itself; save it as is.

## Examples

Preset emotion on ssfm-v21:

```json
{
  "voice_id": "tc_62a8975e695ad26f7fb514d1",
  "text": "Hello! This is Typecast.",
  "model": "ssfm-v21",
  "prompt": {"emotion_preset": "happy", "emotion_intensity": 1.5},
  "output": {"audio_format": "mp3"}
}
```

Smart emotion on ssfm-v30:

```json
{
  "voice_id": "tc_62a8975e695ad26f7fb514d1",
  "text": "I can't believe we actually made it.",
  "model": "ssfm-v30",
  "prompt": {
    "emotion_type": "smart",
    "previous_text": "The storm had been raging for hours.",
    "next_text": "Let's never do that again."
  }
}
```

### Python SDK

```bash
pip install typecast-python
```

```python
from typecast.client import Typecast
from typecast.models import TTSRequest, Prompt, Output

cli = Typecast(api_key="YOUR_API_KEY")

response = cli.text_to_speech(TTSRequest(
    text="Hello! This is Typecast.",
    model="ssfm-v21",
    voice_id="tc_62a8975e695ad26f7fb514d1",
    prompt=Prompt(emotion_preset="happy", emotion_intensity=1.5),
    output=Output(audio_format="mp3"),
))

with open("output.mp3", "wb") as f:
    f.write(response.audio_data)
```

### Python, direct API

```python
import os
import requests

headers = {
    "X-API-KEY": os.environ["TYPECAST_API_KEY"],
    "Content-Type": "application/json",
}

voices = requests.get(
    "https://api.typecast.ai/v2/voices",
    headers=headers,
    params={"model": "ssfm-v30", "gender": "female"},
)
voice_id = voices.json()[0]["voice_id"]

payload = {
    "voice_id": voice_id,
    "text": "Hello! This is Typecast.",
    "model": "ssfm-v30",
    "prompt": {
        "emotion_type": "preset",
        "emotion_preset": "whisper",
        "emotion_intensity": 1.2,
    },
    "output": {"audio_format": "mp3"},
}
response = requests.post(
    "https://api.typecast.ai/v1/text-to-speech", headers=headers, json=payload
)

if response.status_code == 200:
    with open("output.mp3", "wb") as f:
        f.write(response.content)
else:
    print(f"Error: {response.status_code} - {response.text}")
```

### JavaScript SDK

```bash
npm install @neosapience/typecast-js
```

```javascript
import { TypecastClient } from "@neosapience/typecast-js";
import fs from "fs";

const client = new TypecastClient({ apiKey: process.env.TYPECAST_API_KEY });

const audio = await client.textToSpeech({
  text: "Hello! This is Typecast.",
  model: "ssfm-v21",
  voice_id: "tc_62a8975e695ad26f7fb514d1",
  prompt: { emotion_preset: "happy", emotion_intensity: 1.5 },
});

await fs.promises.writeFile("output.wav", Buffer.from(audio.audioData));
```

### cURL

```bash
curl -X POST "https://api.typecast.ai/v1/text-to-speech" \
     -H "X-API-KEY: $TYPECAST_API_KEY" \
     -H "Content-Type: application/json" \
     -d '{"model": "ssfm-v21", "text": "Hello there!", "voice_id": "tc_62a8975e695ad26f7fb514d1"}' \
     > output.wav
```

## Security

- Keep the API key on a server; never embed it in browser or mobile code.
- Load it from an environment variable or a secret manager.
- Rotate keys regularly.

## Support and documentation

- Overview: https://typecast.ai/docs/overview
- API reference: https://typecast.ai/docs/api-reference
- API dashboard: https://typecast.ai/developers/api
- Python SDK: https://github.com/neosapience/typecastsdk-python
- Community: https://discord.gg/fhDDUbBKap
- Sales: sales@neosapience.com
"#;

/// Languages accepted by `language`, as (name, ISO 639-3 code)
pub const LANGUAGES: [(&str, &str); 27] = [
    ("English", "eng"),
    ("Korean", "kor"),
    ("Spanish", "spa"),
    ("German", "deu"),
    ("French", "fra"),
    ("Italian", "ita"),
    ("Polish", "pol"),
    ("Dutch", "nld"),
    ("Russian", "rus"),
    ("Japanese", "jpn"),
    ("Greek", "ell"),
    ("Tamil", "tam"),
    ("Tagalog", "tgl"),
    ("Finnish", "fin"),
    ("Chinese", "zho"),
    ("Slovak", "slk"),
    ("Arabic", "ara"),
    ("Croatian", "hrv"),
    ("Ukrainian", "ukr"),
    ("Indonesian", "ind"),
    ("Danish", "dan"),
    ("Swedish", "swe"),
    ("Malay", "msa"),
    ("Czech", "ces"),
    ("Portuguese", "por"),
    ("Bulgarian", "bul"),
    ("Romanian", "ron"),
];

/// Full Markdown reference, with the emotion section generated from the
/// model capability table.
pub fn knowledge() -> String {
    let mut out = String::from(OVERVIEW);
    out.push_str(&parameter_table());
    out.push_str(&emotion_section());
    out.push_str(ERRORS);
    out.push_str(&language_section());
    out.push_str(FAQ);
    out.push_str(EXAMPLES);
    out
}

fn language_section() -> String {
    let mut out = String::from("\n## Languages\n\n");
    out.push_str(
        "Language is detected from the text when `language` is omitted. Codes are \
         ISO 639-3 and case-insensitive.\n\n",
    );
    out.push_str("| Language | Code |\n|----------|------|\n");
    for (name, code) in LANGUAGES {
        let _ = writeln!(out, "| {name} | `{code}` |");
    }
    out
}

fn parameter_table() -> String {
    let mut out = String::new();
    out.push_str("\n| Parameter | Type | Default | Notes |\n");
    out.push_str("|-----------|------|---------|-------|\n");
    let rows = [
        ("voice_id", "string", "required", "From `get_voices`".to_string()),
        (
            "text",
            "string",
            "required",
            format!("At most {MAX_TEXT_CHARS} characters"),
        ),
        (
            "model",
            "string",
            "required",
            "`ssfm-v21` or `ssfm-v30`".to_string(),
        ),
        (
            "language",
            "string",
            "auto",
            "ISO 639-3 code".to_string(),
        ),
        (
            "prompt.emotion_preset",
            "string",
            "normal",
            "See the emotion table below".to_string(),
        ),
        (
            "prompt.emotion_intensity",
            "number",
            "1.0",
            format!("{MIN_INTENSITY:.1} to {MAX_INTENSITY:.1}"),
        ),
        ("output.volume", "integer", "100", "0 to 200".to_string()),
        (
            "output.audio_pitch",
            "integer",
            "0",
            "-12 to 12 semitones".to_string(),
        ),
        ("output.audio_tempo", "number", "1.0", "0.5 to 2.0".to_string()),
        (
            "output.audio_format",
            "string",
            "wav",
            "`wav` or `mp3`".to_string(),
        ),
        ("seed", "integer", "none", "Reproducible output".to_string()),
    ];
    for (name, kind, default, notes) in rows {
        let _ = writeln!(out, "| `{name}` | {kind} | {default} | {notes} |");
    }
    out
}

fn emotion_section() -> String {
    let mut out = String::from("\n## Emotion support by model\n\n");
    out.push_str("| Model | Presets | Smart emotion | Prompt shape |\n");
    out.push_str("|-------|---------|---------------|--------------|\n");
    for caps in all_capabilities() {
        let presets = caps
            .preset_names()
            .iter()
            .map(|p| format!("`{p}`"))
            .collect::<Vec<_>>()
            .join(", ");
        let smart = if caps.smart_emotion { "yes" } else { "no" };
        let shape = if caps.tagged_prompt {
            "`{\"emotion_type\": \"preset\" | \"smart\", ...}`"
        } else {
            "`{\"emotion_preset\", \"emotion_intensity\"}`"
        };
        let _ = writeln!(out, "| `{}` | {presets} | {smart} | {shape} |", caps.model);
    }
    out.push_str(
        "\nWith `emotion_type` \"smart\" the model infers emotion from the text and the \
         optional `previous_text` and `next_text`; preset and intensity are not sent.\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knowledge_lists_every_model_and_preset() {
        let text = knowledge();
        for caps in all_capabilities() {
            assert!(text.contains(&format!("`{}`", caps.model)));
            for preset in caps.preset_names() {
                assert!(text.contains(&format!("`{preset}`")), "missing {preset}");
            }
        }
    }

    #[test]
    fn test_knowledge_covers_reference_sections() {
        let text = knowledge();
        for needle in [
            "X-API-KEY",
            "/v2/voices",
            "/v1/text-to-speech",
            "| 429 |",
            "ISO 639-3",
            "## Examples",
        ] {
            assert!(text.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn test_knowledge_lists_every_language() {
        let text = knowledge();
        for (name, code) in LANGUAGES {
            assert!(text.contains(&format!("| {name} | `{code}` |")), "missing {name}");
        }
    }

    #[test]
    fn test_knowledge_covers_guidance_faq_and_samples() {
        let text = knowledge();
        for needle in [
            "Always reply in the language the user writes in",
            "### 403 checklist",
            "Starter",
            "## FAQ",
            "**Q8.",
            "pip install typecast-python",
            "npm install @neosapience/typecast-js",
            "import requests",
            "## Security",
        ] {
            assert!(text.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn test_samples_use_current_endpoints() {
        let text = knowledge();
        assert!(!text.contains("/v1/voices"));
        assert!(text.contains("\"emotion_type\": \"preset\""));
    }

    #[test]
    fn test_smart_emotion_row_matches_capabilities() {
        let text = knowledge();
        assert!(text.contains("| `ssfm-v21` | `normal`, `happy`, `sad`, `angry` | no |"));
        assert!(text.contains("| `ssfm-v30` |"));
    }
}
