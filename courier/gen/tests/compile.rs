//! Compile tests for emitted code using trybuild.
//!
//! Emitted fragments are written into small programs that must build and run.

use std::fs;

use courier_define::{HttpMethod, MethodSpec, ParameterSpec, Tag, names};
use courier_gen::analysis::analyze_method;
use courier_gen::codegen::generate_defaults;
use quote::quote;
use tempfile::TempDir;

fn defaulted(name: &str, ty: &str, default: &str) -> ParameterSpec {
    ParameterSpec::new(name, ty)
        .tagged(Tag::new(names::QUERY))
        .optional()
        .with_default(default)
}

#[test]
fn option_defaults_compile_and_apply() {
    let method = MethodSpec::new("list", HttpMethod::Get, "/items", "Result<(), Error>")
        .with_param(defaulted("limit", "Option<u32>", "20"))
        .with_param(defaulted("offset", "Option<u64>", "0"))
        .with_param(defaulted("depth", "Option<u8>", "3"))
        .with_param(defaulted("sort", "Option<String>", "\"name\""));
    let plan = analyze_method(&method).expect("analysis should succeed");
    let defaults = generate_defaults(&plan.params);

    let program = quote! {
        fn rebind(
            limit: Option<u32>,
            offset: Option<u64>,
            depth: Option<u8>,
            sort: Option<String>,
        ) -> (Option<u32>, Option<u64>, Option<u8>, Option<String>) {
            #defaults
            (limit, offset, depth, sort)
        }

        fn main() {
            assert_eq!(
                rebind(None, Some(5), None, None),
                (Some(20), Some(5), Some(3), Some(String::from("name")))
            );
        }
    };
    let file: syn::File = syn::parse2(program).expect("program should parse");

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("option_defaults.rs");
    fs::write(&path, prettyplease::unparse(&file)).unwrap();

    let t = trybuild::TestCases::new();
    t.pass(&path);
}
