use std::sync::{Arc, Mutex};

use news_ninja::{LanguageModel, Prompt};

pub const DIGEST: &str = "Researchers announced a breakthrough today.";
pub const SCRIPT: &str = "Good evening. Here is your news.";

#[derive(Clone)]
pub struct MockModel {
    pub digest: String,
    pub script: String,
    pub calls: Arc<Mutex<Vec<Prompt>>>,
    pub fail_composition: Option<String>,
}

impl Default for MockModel {
    fn default() -> Self {
        Self {
            digest: DIGEST.to_string(),
            script: SCRIPT.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_composition: None,
        }
    }
}

impl MockModel {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_composition: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn broadcast_prompts(&self) -> Vec<Prompt> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| is_broadcast(p))
            .cloned()
            .collect()
    }

    pub fn digest_prompts(&self) -> Vec<Prompt> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| !is_broadcast(p))
            .cloned()
            .collect()
    }
}

fn is_broadcast(prompt: &Prompt) -> bool {
    prompt.user.starts_with("Create broadcast:")
}

impl LanguageModel for MockModel {
    type Error = anyhow::Error;

    fn model_name(&self) -> &str {
        "mock-llama"
    }

    async fn complete(&self, prompt: Prompt) -> Result<String, Self::Error> {
        let broadcast = is_broadcast(&prompt);
        self.calls.lock().unwrap().push(prompt);

        if !broadcast {
            return Ok(self.digest.clone());
        }
        if let Some(ref msg) = self.fail_composition {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.script.clone())
    }
}
