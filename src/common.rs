use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value;

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_string_to_file(filename: &str, content: &str) -> std::io::Result<()> {
    let path = Path::new(filename);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    handlebars_helper!(exists: |v: Value| !v.is_null());
    handlebars.register_helper("exists", Box::new(exists));

    handlebars_helper!(isnull: |v: Value| v.is_null());
    handlebars.register_helper("isnull", Box::new(isnull));

    handlebars_helper!(stringeq: |s1: String, s2: String| s1.eq(&s2));
    handlebars.register_helper("stringeq", Box::new(stringeq));

    handlebars
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn handlebars_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template("Tracking {{name}}", &json!({"name": "Apollo"}))
            .expect("This to render");
        assert_eq!(res, "Tracking Apollo");
    }

    #[test]
    fn handlebars_can_iterate_products() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                r#"{{#each products as |product|}}
- {{product.name}}
{{/each}}"#,
                &json!({"products": [
                    {"name": "Apollo API"},
                    {"name": "Apollo SDK"}
                ]}),
            )
            .expect("This to render");
        assert_eq!(res, "- Apollo API\n- Apollo SDK\n");
    }

    #[test]
    fn handlebars_helper_exists_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                r#"{{#if (exists item.link)}}{{item.link}}{{else}}No link provided.{{/if}}"#,
                &json!({"item": {"link": null}}),
            )
            .expect("This to render");
        assert_eq!(res, "No link provided.");
    }

    #[test]
    fn handlebars_helper_stringeq_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                r#"{{#if (stringeq "Product" item.type)}}product{{/if}}"#,
                &json!({"item": {"type": "Product"}}),
            )
            .expect("This to render");
        assert_eq!(res, "product");
    }
}
