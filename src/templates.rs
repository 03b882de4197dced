//! HTML page rendering
//!
//! Templates are compiled into the binary and parsed once at startup, so a
//! broken template fails the process before it serves anything.

use minijinja::Environment;
use serde::Serialize;

use crate::error::Result;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("upload.html", include_str!("../templates/upload.html")),
    ("detail.html", include_str!("../templates/detail.html")),
    ("chat.html", include_str!("../templates/chat.html")),
];

/// Parsed page templates. `.html` names are auto-escaped.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context)?)
    }
}
