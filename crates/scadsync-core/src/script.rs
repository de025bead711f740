use crate::generate::generate_scad;
use crate::model::{EditorParameters, OutputStyle, ParsedShape};
use crate::parse::{parse_script, scan_shapes};
use crate::scene::SceneModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&str)>;

/// Script text shared between the scene editor and a script editor.
///
/// `set` replaces the text and then calls every subscriber, in the order
/// they subscribed, with the new text.
#[derive(Default)]
pub struct ScriptBuffer {
    text: String,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl ScriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        for (_, callback) in &mut self.subscribers {
            callback(&self.text);
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&str) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for ScriptBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptBuffer")
            .field("text", &self.text)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Scene, editor parameters and script buffer, kept in sync.
///
/// Scene to script is explicit (`sync_to_script`); script to scene happens
/// on every `edit_script`.
#[derive(Debug, Default)]
pub struct Workspace {
    pub scene: SceneModel,
    pub params: EditorParameters,
    pub script: ScriptBuffer,
}

impl Workspace {
    pub fn new(scene: SceneModel, params: EditorParameters) -> Self {
        Self {
            scene,
            params,
            script: ScriptBuffer::new(),
        }
    }

    /// Regenerate the script from the scene and publish it.
    pub fn sync_to_script(&mut self) -> &str {
        let text = generate_scad(self.scene.shapes(), &self.params);
        tracing::info!(shapes = self.scene.len(), "synced scene to script");
        self.script.set(text);
        self.script.text()
    }

    /// Publish edited script text and rebuild the scene from it.
    ///
    /// Unrecognized text leaves the scene empty rather than failing.
    pub fn edit_script(&mut self, text: impl Into<String>) -> usize {
        self.script.set(text);
        let parsed = self.parse_current();
        self.scene.replace_from_parsed(parsed);
        let count = self.scene.len();
        tracing::info!(shapes = count, "rebuilt scene from script");
        count
    }

    fn parse_current(&self) -> Vec<ParsedShape> {
        match self.params.style {
            OutputStyle::Solid => scan_shapes(self.script.text()),
            OutputStyle::Shell => parse_script(self.script.text(), self.params.unit),
        }
    }
}
