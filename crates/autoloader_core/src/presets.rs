//! Built-in alias and dependency tables.
//!
//! These mirror the grammar catalogue shipped with common highlighter
//! distributions. Runtime overrides in [`Tables`](crate::Tables) take
//! precedence over every entry here.

/// Grammars that must be loaded before the keyed grammar.
pub static PRESET_DEPENDENCIES: &[(&str, &[&str])] = &[
    ("actionscript", &["javascript"]),
    ("apex", &["clike", "sql"]),
    ("arduino", &["cpp"]),
    ("aspnet", &["markup", "csharp"]),
    ("bison", &["c"]),
    ("c", &["clike"]),
    ("chaiscript", &["clike", "cpp"]),
    ("coffeescript", &["javascript"]),
    ("cpp", &["c"]),
    ("crystal", &["ruby"]),
    ("csharp", &["clike"]),
    ("cshtml", &["markup", "csharp"]),
    ("css-extras", &["css"]),
    ("dart", &["clike"]),
    ("django", &["markup-templating"]),
    ("erb", &["ruby", "markup-templating"]),
    ("etlua", &["lua", "markup-templating"]),
    ("flow", &["javascript"]),
    ("fsharp", &["clike"]),
    ("ftl", &["markup-templating"]),
    ("glsl", &["c"]),
    ("go", &["clike"]),
    ("groovy", &["clike"]),
    ("haml", &["ruby"]),
    ("handlebars", &["markup-templating"]),
    ("hlsl", &["c"]),
    ("idris", &["haskell"]),
    ("java", &["clike"]),
    ("javadoc", &["markup", "java", "javadoclike"]),
    ("javascript", &["clike"]),
    ("js-extras", &["javascript"]),
    ("js-templates", &["javascript"]),
    ("jsdoc", &["javascript", "javadoclike", "typescript"]),
    ("jsx", &["markup", "javascript"]),
    ("kotlin", &["clike"]),
    ("latte", &["clike", "markup-templating", "php"]),
    ("less", &["css"]),
    ("markdown", &["markup"]),
    ("markup-templating", &["markup"]),
    ("n4js", &["javascript"]),
    ("objectivec", &["c"]),
    ("opencl", &["c"]),
    ("parser", &["markup"]),
    ("php", &["markup-templating"]),
    ("php-extras", &["php"]),
    ("phpdoc", &["php", "javadoclike"]),
    ("plsql", &["sql"]),
    ("protobuf", &["clike"]),
    ("pug", &["markup", "javascript"]),
    ("purescript", &["haskell"]),
    ("qml", &["javascript"]),
    ("racket", &["scheme"]),
    ("ruby", &["clike"]),
    ("sass", &["css"]),
    ("scala", &["java"]),
    ("scss", &["css"]),
    ("smarty", &["markup-templating"]),
    ("solidity", &["clike"]),
    ("soy", &["markup-templating"]),
    ("sparql", &["turtle"]),
    ("t4-cs", &["t4-templating", "csharp"]),
    ("textile", &["markup"]),
    ("tsx", &["jsx", "typescript"]),
    ("tt2", &["clike", "markup-templating"]),
    ("twig", &["markup-templating"]),
    ("typescript", &["javascript"]),
    ("vala", &["clike"]),
    ("velocity", &["markup"]),
    ("wiki", &["markup"]),
    ("xquery", &["markup"]),
];

/// Alternative names mapped to their canonical grammar.
pub static PRESET_ALIASES: &[(&str, &str)] = &[
    ("adoc", "asciidoc"),
    ("atom", "markup"),
    ("coffee", "coffeescript"),
    ("context", "latex"),
    ("cs", "csharp"),
    ("dockerfile", "docker"),
    ("dotnet", "csharp"),
    ("elisp", "lisp"),
    ("emacs", "lisp"),
    ("emacs-lisp", "lisp"),
    ("g4", "antlr4"),
    ("gawk", "awk"),
    ("gitignore", "ignore"),
    ("gni", "gn"),
    ("hbs", "handlebars"),
    ("hgignore", "ignore"),
    ("hs", "haskell"),
    ("html", "markup"),
    ("jinja2", "django"),
    ("js", "javascript"),
    ("kt", "kotlin"),
    ("kts", "kotlin"),
    ("mathml", "markup"),
    ("md", "markdown"),
    ("npmignore", "ignore"),
    ("objc", "objectivec"),
    ("oscript", "bsl"),
    ("py", "python"),
    ("razor", "cshtml"),
    ("rb", "ruby"),
    ("rkt", "racket"),
    ("rpy", "renpy"),
    ("rss", "markup"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("sln", "solution-file"),
    ("ssml", "markup"),
    ("svg", "markup"),
    ("tex", "latex"),
    ("ts", "typescript"),
    ("vb", "visual-basic"),
    ("vba", "visual-basic"),
    ("webmanifest", "json"),
    ("xml", "markup"),
    ("yml", "yaml"),
];
