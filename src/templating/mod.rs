//! Tera templating for rendered outputs.
//!
//! - [`renderer`] - [`TemplateRenderer`], loading templates from the site root on demand
//! - [`filters`] - the `markdown`, `datetime` and `limit` filters
//!
//! # Template Syntax
//!
//! Templates use Tera (Jinja2-like) syntax. Identifiers are paths relative to
//! the site root, in `{% extends %}` and `{% include %}` as well as in the
//! manifest:
//!
//! ```html
//! {% extends "templates/base.html" %}
//! {% block content %}
//!   <h1>{{ title }}</h1>
//!   <time>{{ date | datetime(fmt="%B %d, %Y") }}</time>
//!   {{ content | safe }}
//! {% endblock content %}
//! ```
//!
//! `.html`, `.htm` and `.xml` templates are auto-escaped.

pub mod filters;
pub mod renderer;

pub use renderer::TemplateRenderer;
