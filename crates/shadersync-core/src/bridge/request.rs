use crate::error::Result;
use crate::runtime::RuntimeBoundary;
use crate::session::Slot;
use std::fmt;

/// A runtime command of the form `name[,arg[,arg...]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Parses free-form console text.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split(',');
        let name = parts.next().unwrap_or_default().to_string();
        Self {
            name,
            args: parts.map(str::to_string).collect(),
        }
    }

    /// `name,on` or `name,off`.
    pub fn toggle(name: impl Into<String>, on: bool) -> Self {
        Self::new(name).arg(if on { "on" } else { "off" })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, ",{}", arg)?;
        }
        Ok(())
    }
}

/// Fullscreen commands, handled by the host instead of the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenAction {
    Query,
    On,
    Off,
    Toggle,
}

impl FullscreenAction {
    /// Recognizes exactly `fullscreen` and `fullscreen,on|off|toggle`.
    pub fn from_command(command: &Command) -> Option<Self> {
        if command.name() != "fullscreen" {
            return None;
        }
        match command.args() {
            [] => Some(FullscreenAction::Query),
            [arg] if arg == "on" => Some(FullscreenAction::On),
            [arg] if arg == "off" => Some(FullscreenAction::Off),
            [arg] if arg == "toggle" => Some(FullscreenAction::Toggle),
            _ => None,
        }
    }
}

/// Every operation the engine performs against the runtime.
#[derive(Debug, Clone, Copy)]
pub enum RuntimeRequest<'a> {
    Command(&'a Command),
    Query(&'a str),
    SetSource { slot: Slot, text: &'a str },
    DefaultSource(Slot),
    AssetLoaded { name: &'a str, extension: &'a str },
}

impl RuntimeRequest<'_> {
    /// Exported runtime function backing this request.
    pub fn function(&self) -> &'static str {
        match self {
            RuntimeRequest::Command(_) => "command",
            RuntimeRequest::Query(_) => "query",
            RuntimeRequest::SetSource {
                slot: Slot::Fragment,
                ..
            } => "setFrag",
            RuntimeRequest::SetSource {
                slot: Slot::Vertex, ..
            } => "setVert",
            RuntimeRequest::DefaultSource(Slot::Fragment) => "getDefaultSceneFrag",
            RuntimeRequest::DefaultSource(Slot::Vertex) => "getDefaultSceneVert",
            RuntimeRequest::AssetLoaded { .. } => "loadAsset",
        }
    }

    /// Performs the call. This is the only place request payloads become
    /// runtime strings.
    pub(crate) fn invoke(&self, boundary: &dyn RuntimeBoundary) -> Result<Option<String>> {
        match self {
            RuntimeRequest::Command(command) => {
                let text = command.to_string();
                boundary.call(self.function(), &[text.as_str()])
            }
            RuntimeRequest::Query(name) => boundary.call(self.function(), &[*name]),
            RuntimeRequest::SetSource { text, .. } => boundary.call(self.function(), &[*text]),
            RuntimeRequest::DefaultSource(_) => boundary.call(self.function(), &[]),
            RuntimeRequest::AssetLoaded { name, extension } => {
                boundary.call(self.function(), &[*name, *extension])
            }
        }
    }
}

impl fmt::Display for RuntimeRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeRequest::Command(command) => write!(f, "sending command '{}'", command),
            RuntimeRequest::Query(name) => write!(f, "querying '{}'", name),
            RuntimeRequest::SetSource { slot, .. } => write!(f, "setting {} shader", slot),
            RuntimeRequest::DefaultSource(slot) => {
                write!(f, "fetching default {} shader", slot)
            }
            RuntimeRequest::AssetLoaded { name, .. } => write!(f, "loading asset '{}'", name),
        }
    }
}
