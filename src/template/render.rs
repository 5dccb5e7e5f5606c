use std::collections::HashMap;
use std::sync::LazyLock;

use minijinja::{Environment, UndefinedBehavior, Value};

use crate::config::types::PromptTemplate;
use crate::error::GptMyPrError;

/// Shared minijinja environment with strict undefined behavior.
static JINJA_ENV: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
});

/// Rendered prompt pair ready for the AI model.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// Render a prompt template pair with the given variables.
///
/// Takes ownership of `vars` so the file content is moved into the context
/// rather than cloned; both templates share the one context value.
pub fn render_prompt(
    template: &PromptTemplate,
    vars: HashMap<String, Value>,
) -> Result<RenderedPrompt, GptMyPrError> {
    let env = &*JINJA_ENV;
    let ctx = Value::from_iter(vars);

    let system = render_template(env, "system", &template.system, &ctx)?;
    let user = render_template(env, "user", &template.user, &ctx)?;

    Ok(RenderedPrompt { system, user })
}

fn render_template(
    env: &Environment,
    name: &str,
    template_str: &str,
    ctx: &Value,
) -> Result<String, GptMyPrError> {
    let tmpl = env
        .template_from_str(template_str)
        .map_err(|e| GptMyPrError::Other(format!("failed to parse {name} template: {e}")))?;

    Ok(tmpl.render(ctx.clone())?)
}
