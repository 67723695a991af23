//! End-to-end tests: annotated Rust source in, formatted client files out.

use std::fs;
use std::path::Path;

use courier_gen::config::GeneratorConfig;
use courier_gen::errors::GeneratorError;
use courier_gen::frontend::rust::parse_source;
use courier_gen::output::{generate_and_write, generate_interface};
use tempfile::TempDir;

const PET_STORE: &str = r#"
/// Pets and their owners.
#[api(base_url = "https://pets.example.com/v1")]
pub trait PetStore {
    /// Fetch one pet.
    #[get("/pets/{id}")]
    #[bearer_auth(token = "secret")]
    async fn get_pet(&self, #[path] id: u64) -> Result<Pet, Error>;

    #[get("/pets")]
    async fn list_pets(
        &self,
        #[query] species: Option<String>,
        #[query("max")] #[default(20)] limit: Option<u32>,
    ) -> Result<Vec<Pet>, Error>;

    #[post("/pets")]
    #[header("Content-Type", "application/json")]
    async fn create_pet(&self, #[body] pet: NewPet) -> Result<Envelope<Pet>, Error>;

    #[delete("/pets/{id}")]
    async fn delete_pet(&self, #[path] id: u64, #[bearer_token] token: String) -> Result<(), Error>;
}
"#;

fn parse(source: &str) -> courier_gen::frontend::Definitions {
    parse_source(source, Path::new("api.rs")).expect("source should parse")
}

#[test]
fn generates_a_complete_client() {
    let defs = parse(PET_STORE);
    assert!(defs.faults.is_empty());

    let file = generate_interface(&defs.interfaces[0], &GeneratorConfig::default()).unwrap();
    assert_eq!(file.file_name, "pet_store.rs");
    assert!(file.faults.is_empty());

    let code = &file.code;
    assert!(code.starts_with("// This code was automatically generated by courier-gen."));
    assert!(code.contains("pub struct PetStoreClient"));
    assert!(code.contains("impl super::PetStore for PetStoreClient"));
    assert!(code.contains("\"https://pets.example.com/v1\""));
    for method in ["get_pet", "list_pets", "create_pet", "delete_pet"] {
        assert!(code.contains(&format!("async fn {method}(")), "missing {method}");
    }
    assert!(code.contains("courier_http::Method::DELETE"));
    assert!(code.contains("static __AUTH"));
    assert!(code.contains("let __default: u32 = 20;"));
    assert!(code.contains("courier_http::Envelope::new(__meta, Some(__value))"));
    assert!(code.contains("## Endpoints"));
}

#[test]
fn faulted_methods_become_compile_errors() {
    let defs = parse(
        r#"
        #[api]
        pub trait Broken {
            #[get("/ok")]
            async fn ok(&self) -> Result<String, Error>;

            #[get("/bad")]
            async fn bad(&self) -> String;
        }
        "#,
    );

    let file = generate_interface(&defs.interfaces[0], &GeneratorConfig::default()).unwrap();
    assert_eq!(file.faults.len(), 1);
    assert!(file.code.contains("async fn ok("));
    assert!(file.code.contains("compile_error!"));
    assert!(file.code.contains("cannot implement `bad`"));
    assert!(file.code.contains("## Not generated"));
}

#[test]
fn missing_verb_is_reported_and_blocks_writing() {
    let defs = parse(
        r#"
        #[api]
        pub trait NoVerb {
            async fn orphan(&self) -> Result<(), Error>;
        }
        "#,
    );
    assert_eq!(defs.faults.len(), 1);
    assert!(defs.interfaces[0].methods.is_empty());

    let dir = TempDir::new().unwrap();
    let err = generate_and_write(&defs, &GeneratorConfig::default(), dir.path(), false, false)
        .unwrap_err();
    assert!(matches!(err, GeneratorError::Faults(ref faults) if faults.len() == 1));
    assert!(!dir.path().join("no_verb.rs").exists());
}

#[test]
fn writes_one_file_per_interface() {
    let source = format!(
        "{PET_STORE}\n{}",
        r#"
        #[api(base_url = "https://auth.example.com")]
        pub trait AuthApi {
            #[post("/token")]
            #[form]
            #[field("grant_type", "client_credentials")]
            async fn token(&self, #[field] client_id: String) -> Result<Token, Error>;
        }
        "#
    );
    let defs = parse(&source);
    let dir = TempDir::new().unwrap();

    let generated =
        generate_and_write(&defs, &GeneratorConfig::default(), dir.path(), false, false).unwrap();
    assert_eq!(generated.len(), 2);

    let pets = fs::read_to_string(dir.path().join("pet_store.rs")).unwrap();
    let auth = fs::read_to_string(dir.path().join("auth_api.rs")).unwrap();
    assert!(pets.contains("PetStoreClient"));
    assert!(auth.contains("AuthApiClient"));
    assert!(auth.contains("\"grant_type\""));
    syn::parse_file(&auth).expect("written file should parse");
}
