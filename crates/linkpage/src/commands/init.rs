//! Scaffold a new link site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Files written by `init`, relative to the project root.
const SCAFFOLD: &[(&str, &str)] = &[
    ("linkpage.toml", DEFAULT_CONFIG),
    ("links.yaml", DEFAULT_LINKS),
    ("templates/index.html", DEFAULT_INDEX),
    ("templates/page.html", DEFAULT_PAGE),
    ("templates/qr.html", DEFAULT_QR),
    ("assets/style.css", DEFAULT_STYLE),
];

/// Run the init command in `root`.
pub async fn run(root: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing linkpage...");

    for (relative, contents) in SCAFFOLD {
        let path = root.join(relative);

        if path.exists() && !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", relative);
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", relative))?;
        tracing::info!("Created {}", relative);
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Install the QR library with 'npm install qrcode-generator', then run 'linkpage build'.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# linkpage configuration

[site]
# YAML document listing the pages
links = "links.yaml"

# index.html, page.html and the optional qr.html
templates = "templates"

# Copied verbatim to <output>/assets
assets = "assets"

# Deleted and regenerated on every build
output = "dist"

# Copied to the output root when present (custom domain for static hosts)
domain_file = "CNAME"

# Absolute site URL, available to qr.html as {{base_url}}
base_url = "https://links.example.com"

[bundle]
# Minified into <output>/assets/qrcode.min.js for the QR pages
enabled = true
entry = "node_modules/qrcode-generator/qrcode.js"
output = "qrcode.min.js"
minify = true
"#;

const DEFAULT_LINKS: &str = r#"title: My Links
description: Everything I'm up to, in one place.

pages:
  - slug: github
    title: GitHub
    url: https://github.com/
    description: Code and side projects.
  - slug: blog
    title: Blog
    url: https://example.com/blog
"#;

const DEFAULT_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{title}}</title>
  <link rel="stylesheet" href="assets/style.css">
</head>
<body>
  <h1>{{title}}</h1>
  {{#description}}
  <p>{{description}}</p>
  {{/description}}
  <ul class="links">
    {{#pages}}
    <li><a href="{{slug}}/">{{title}}</a></li>
    {{/pages}}
  </ul>
</body>
</html>
"#;

const DEFAULT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta http-equiv="refresh" content="3; url={{url}}">
  <title>{{title}}</title>
  <link rel="stylesheet" href="../assets/style.css">
</head>
<body>
  <h1>{{title}}</h1>
  {{#description}}
  <p>{{description}}</p>
  {{/description}}
  <p><a href="{{url}}">{{url}}</a></p>
  <p><a href="qr/">QR code</a></p>
</body>
</html>
"#;

const DEFAULT_QR: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{title}} QR code</title>
  <link rel="stylesheet" href="../../assets/style.css">
</head>
<body>
  <h1>{{title}}</h1>
  <div id="qr" data-url="{{{base_url}}}/{{slug}}/"></div>
  <script src="../../assets/qrcode.min.js"></script>
  <script>
    var el = document.getElementById('qr');
    var qr = qrcode(0, 'M');
    qr.addData(el.dataset.url);
    qr.make();
    el.innerHTML = qr.createSvgTag(6);
  </script>
</body>
</html>
"#;

const DEFAULT_STYLE: &str = r#"body {
  font-family: system-ui, -apple-system, sans-serif;
  max-width: 32rem;
  margin: 3rem auto;
  padding: 0 1rem;
  text-align: center;
}

.links {
  list-style: none;
  padding: 0;
}

.links a {
  display: block;
  margin: 0.75rem 0;
  padding: 0.75rem;
  border: 1px solid currentColor;
  border-radius: 0.5rem;
  text-decoration: none;
}
"#;
