//! Compiled-module suite provider
//!
//! Loads a WebAssembly module (local file or, with the `fetch` feature, an
//! HTTP(S) URL), instantiates it with the host imports from [`imports`], runs
//! its entry point once so it can report a title, and exposes the exported
//! Fibonacci functions as an ordinary [`Suite`].
//!
//! Loading is async and may fail; the resulting suite is synchronous and
//! immutable, so the runner never sees any of this.

pub mod imports;
pub mod text;

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use wasmer::{Function, FunctionEnv, FunctionType, Instance, Module, Store, Type, Value};
use wasmer_compiler_singlepass::Singlepass;

use crate::core::error::{BenchError, BenchResult, InvocationError};
use crate::suite::{FunctionId, Suite};
use imports::{build_imports, HostEnv};

pub const WASM_SUITE_NAME: &str = "WebAssembly";

/// Entry points called once after instantiation, preferred first
const ENTRY_POINTS: [&str; 2] = ["_main", "main"];

/// Where module bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSource {
    Path(PathBuf),
    Url(String),
}

impl ModuleSource {
    /// `http://` and `https://` are URLs, anything else a path
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            ModuleSource::Url(s.to_string())
        } else {
            ModuleSource::Path(PathBuf::from(s))
        }
    }

    pub async fn fetch(&self) -> BenchResult<Vec<u8>> {
        match self {
            ModuleSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| BenchError::suite_load(self.to_string(), e)),
            ModuleSource::Url(url) => fetch_url(url)
                .await
                .map_err(|e| BenchError::suite_load(url.clone(), e)),
        }
    }
}

impl fmt::Display for ModuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleSource::Path(path) => write!(f, "{}", path.display()),
            ModuleSource::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(feature = "fetch")]
async fn fetch_url(url: &str) -> Result<Vec<u8>, String> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| format!("request failed: {}", e))?
        .error_for_status()
        .map_err(|e| format!("bad status: {}", e))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("failed to read body: {}", e))?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "fetch"))]
async fn fetch_url(_url: &str) -> Result<Vec<u8>, String> {
    Err("HTTP module sources require the `fetch` feature".into())
}

/// A successfully instantiated module
#[derive(Debug)]
pub struct LoadedModule {
    pub suite: Suite,
    /// Text the module reported through `_set_title`, if any
    pub title: Option<String>,
}

/// Fetch, compile and instantiate a module as the `WebAssembly` suite
pub async fn load_module(source: &ModuleSource) -> BenchResult<LoadedModule> {
    let bytes = source.fetch().await?;
    let source_name = source.to_string();
    info!("Loaded {} bytes from {}", bytes.len(), source_name);

    tokio::task::spawn_blocking(move || instantiate(&bytes, WASM_SUITE_NAME, &source_name))
        .await
        .map_err(|e| BenchError::Join(e.to_string()))?
}

/// Compile and instantiate `bytes` (binary or, with wasmer's `wat` support, text)
pub fn instantiate(bytes: &[u8], suite_name: &str, source_name: &str) -> BenchResult<LoadedModule> {
    let load_err = |reason: String| BenchError::suite_load(source_name, reason);

    let mut store = Store::new(Singlepass::default());
    let module = Module::new(&store, bytes).map_err(|e| load_err(format!("compile error: {}", e)))?;

    let env = FunctionEnv::new(&mut store, HostEnv::default());
    let import_object = build_imports(&mut store, &module, &env).map_err(load_err)?;
    let instance = Instance::new(&mut store, &module, &import_object)
        .map_err(|e| load_err(format!("instantiation error: {}", e)))?;

    // Modules that define their own memory export it instead of importing ours
    if env.as_ref(&store).memory.is_none() {
        if let Ok(memory) = instance.exports.get_memory("memory") {
            env.as_mut(&mut store).memory = Some(memory.clone());
        }
    }

    run_entry_point(&mut store, &instance).map_err(load_err)?;

    let title = env.as_ref(&store).title.clone();
    if title.is_none() {
        warn!("{} did not report a title", source_name);
    }

    let mut exports = Vec::with_capacity(FunctionId::ALL.len());
    for id in FunctionId::ALL {
        let (name, function) = find_export(&instance, id).ok_or_else(|| {
            load_err(format!(
                "missing export for '{}' (tried {})",
                id,
                id.export_names().join(", ")
            ))
        })?;
        let ty = function.ty(&store);
        let signature = ExportSignature::of(&ty)
            .ok_or_else(|| load_err(format!("export '{}' has unsupported signature {}", name, ty)))?;
        exports.push((id, function, signature));
    }

    let store = Arc::new(Mutex::new(store));
    let mut suite = Suite::new(suite_name);
    for (id, function, signature) in exports {
        let store = Arc::clone(&store);
        suite = suite.with_fallible(id, move |n| call_export(&store, &function, signature, n));
    }

    info!("Instantiated {} as suite '{}'", source_name, suite_name);
    Ok(LoadedModule { suite, title })
}

fn run_entry_point(store: &mut Store, instance: &Instance) -> Result<(), String> {
    for name in ENTRY_POINTS {
        let Ok(entry) = instance.exports.get_function(name) else {
            continue;
        };
        if !entry.ty(store).params().is_empty() {
            warn!("Skipping entry point '{}': it expects arguments", name);
            return Ok(());
        }
        entry
            .call(store, &[])
            .map_err(|e| format!("entry point '{}' failed: {}", name, e))?;
        return Ok(());
    }
    Ok(())
}

fn find_export(instance: &Instance, id: FunctionId) -> Option<(&'static str, Function)> {
    id.export_names().into_iter().find_map(|name| {
        instance
            .exports
            .get_function(name)
            .ok()
            .map(|f| (name, f.clone()))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntWidth {
    I32,
    I64,
}

impl IntWidth {
    fn of(ty: Type) -> Option<Self> {
        match ty {
            Type::I32 => Some(IntWidth::I32),
            Type::I64 => Some(IntWidth::I64),
            _ => None,
        }
    }
}

/// One integer in, one integer out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ExportSignature {
    param: IntWidth,
    result: IntWidth,
}

impl ExportSignature {
    fn of(ty: &FunctionType) -> Option<Self> {
        match (ty.params(), ty.results()) {
            ([param], [result]) => Some(Self {
                param: IntWidth::of(*param)?,
                result: IntWidth::of(*result)?,
            }),
            _ => None,
        }
    }
}

fn call_export(
    store: &Mutex<Store>,
    function: &Function,
    signature: ExportSignature,
    n: u32,
) -> Result<u64, InvocationError> {
    let arg = match signature.param {
        IntWidth::I32 => Value::I32(i32::try_from(n).map_err(|_| InvocationError::Overflow { input: n })?),
        IntWidth::I64 => Value::I64(i64::from(n)),
    };

    let mut store = store
        .lock()
        .map_err(|e| InvocationError::Other(format!("store lock poisoned: {}", e)))?;
    let results = function
        .call(&mut *store, &[arg])
        .map_err(|e| InvocationError::Trap(e.to_string()))?;

    let value = match (signature.result, results.first()) {
        (IntWidth::I32, Some(Value::I32(v))) => u64::try_from(*v).ok(),
        (IntWidth::I64, Some(Value::I64(v))) => u64::try_from(*v).ok(),
        (_, other) => {
            return Err(InvocationError::Other(format!(
                "unexpected return value {:?}",
                other
            )))
        }
    };
    value.ok_or(InvocationError::Overflow { input: n })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::{verify_agreement, BenchmarkRunner};
    use crate::suite::native_suite;

    /// Emscripten-style module: imported memory, globals, table and title callback
    const FIB_WAT: &str = r#"
(module
  (import "env" "memory" (memory 1))
  (import "env" "memoryBase" (global i32))
  (import "env" "tableBase" (global i32))
  (import "env" "table" (table 0 funcref))
  (import "env" "_set_title" (func $set_title (param i32)))
  (data (i32.const 16) "WAT Fibonacci\00")
  (func (export "_main")
    (call $set_title (i32.const 16)))
  (func $loop (export "_fibonacciLoop") (param $n i32) (result i32)
    (local $a i32) (local $b i32) (local $t i32)
    (local.set $b (i32.const 1))
    (block $done
      (loop $next
        (br_if $done (i32.eqz (local.get $n)))
        (local.set $t (i32.add (local.get $a) (local.get $b)))
        (local.set $a (local.get $b))
        (local.set $b (local.get $t))
        (local.set $n (i32.sub (local.get $n) (i32.const 1)))
        (br $next)))
    (local.get $a))
  (func $rec (export "_fibonacciRec") (param $n i32) (result i32)
    (if (result i32) (i32.lt_u (local.get $n) (i32.const 2))
      (then (local.get $n))
      (else
        (i32.add
          (call $rec (i32.sub (local.get $n) (i32.const 1)))
          (call $rec (i32.sub (local.get $n) (i32.const 2)))))))
  (func (export "_fibonacciMemo") (param $n i32) (result i32)
    (call $loop (local.get $n))))
"#;

    /// Self-contained 64-bit module with unprefixed export names
    const FIB64_WAT: &str = r#"
(module
  (memory (export "memory") 1)
  (func $loop (export "fibonacciLoop") (param $n i64) (result i64)
    (local $a i64) (local $b i64) (local $t i64)
    (local.set $b (i64.const 1))
    (block $done
      (loop $next
        (br_if $done (i64.eqz (local.get $n)))
        (local.set $t (i64.add (local.get $a) (local.get $b)))
        (local.set $a (local.get $b))
        (local.set $b (local.get $t))
        (local.set $n (i64.sub (local.get $n) (i64.const 1)))
        (br $next)))
    (local.get $a))
  (func (export "fibonacciRec") (param $n i64) (result i64)
    (call $loop (local.get $n)))
  (func (export "fibonacciMemo") (param $n i64) (result i64)
    (call $loop (local.get $n))))
"#;

    const TRAPPING_WAT: &str = r#"
(module
  (func (export "_fibonacciLoop") (param i32) (result i32) (i32.const 1))
  (func (export "_fibonacciRec") (param i32) (result i32) unreachable)
  (func (export "_fibonacciMemo") (param i32) (result i32) (i32.const 1)))
"#;

    fn load(wat: &str) -> BenchResult<LoadedModule> {
        instantiate(wat.as_bytes(), WASM_SUITE_NAME, "test.wat")
    }

    #[test]
    fn test_instantiate_reports_title() {
        let loaded = load(FIB_WAT).unwrap();
        assert_eq!(loaded.title.as_deref(), Some("WAT Fibonacci"));
        assert_eq!(loaded.suite.name(), WASM_SUITE_NAME);
        assert!(loaded.suite.is_complete());
    }

    #[test]
    fn test_exports_compute_fibonacci() {
        let loaded = load(FIB_WAT).unwrap();
        for id in FunctionId::ALL {
            let f = loaded.suite.function(id).unwrap();
            assert_eq!(f(10).unwrap(), 55, "{}", id);
            assert_eq!(f(20).unwrap(), 6765, "{}", id);
        }
    }

    #[test]
    fn test_i64_module_without_title() {
        let loaded = load(FIB64_WAT).unwrap();
        assert_eq!(loaded.title, None);
        let f = loaded.suite.function(FunctionId::Loop).unwrap();
        assert_eq!(f(92).unwrap(), 7_540_113_804_746_346_429);
    }

    #[test]
    fn test_i32_overflow_is_an_invocation_error() {
        let loaded = load(FIB_WAT).unwrap();
        let f = loaded.suite.function(FunctionId::Loop).unwrap();
        assert!(matches!(f(47), Err(InvocationError::Overflow { input: 47 })));
    }

    #[test]
    fn test_trap_is_an_invocation_error() {
        let loaded = load(TRAPPING_WAT).unwrap();
        let f = loaded.suite.function(FunctionId::Recursive).unwrap();
        assert!(matches!(f(5), Err(InvocationError::Trap(_))));

        let err = BenchmarkRunner::new(5, 2)
            .unwrap()
            .run(&[loaded.suite])
            .unwrap_err();
        assert!(matches!(
            err,
            BenchError::Invocation {
                function: FunctionId::Recursive,
                run_index: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_export_fails_to_load() {
        let wat = r#"(module (func (export "_fibonacciLoop") (param i32) (result i32) (local.get 0)))"#;
        let err = load(wat).unwrap_err();
        assert!(matches!(err, BenchError::SuiteLoad { .. }));
        assert!(err.to_string().contains("recursive"));
    }

    #[test]
    fn test_unsupported_signature_fails_to_load() {
        let wat = r#"
(module
  (func (export "_fibonacciLoop") (param f64) (result f64) (local.get 0))
  (func (export "_fibonacciRec") (param i32) (result i32) (local.get 0))
  (func (export "_fibonacciMemo") (param i32) (result i32) (local.get 0)))
"#;
        assert!(matches!(load(wat).unwrap_err(), BenchError::SuiteLoad { .. }));
    }

    #[test]
    fn test_unknown_import_fails_to_load() {
        let wat = r#"(module (import "env" "abort" (func (param i32))))"#;
        let err = load(wat).unwrap_err();
        assert!(err.to_string().contains("abort"));

        let wat = r#"(module (import "wasi" "fd_write" (func)))"#;
        assert!(matches!(load(wat).unwrap_err(), BenchError::SuiteLoad { .. }));
    }

    #[test]
    fn test_invalid_bytes_fail_to_load() {
        let err = instantiate(b"\0asm garbage", WASM_SUITE_NAME, "broken.wasm").unwrap_err();
        match err {
            BenchError::SuiteLoad { source_name, .. } => assert_eq!(source_name, "broken.wasm"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wasm_and_native_agree_and_benchmark() {
        let loaded = load(FIB_WAT).unwrap();
        let suites = vec![native_suite(), loaded.suite];

        assert_eq!(verify_agreement(20, &suites).unwrap(), 6765);

        let records = BenchmarkRunner::new(20, 2).unwrap().run(&suites).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.is_complete()));
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(
            ModuleSource::parse("https://example.com/fibonacci.wasm"),
            ModuleSource::Url("https://example.com/fibonacci.wasm".into())
        );
        assert_eq!(
            ModuleSource::parse("assets/fibonacci.wasm"),
            ModuleSource::Path(PathBuf::from("assets/fibonacci.wasm"))
        );
    }

    #[tokio::test]
    async fn test_load_module_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fibonacci.wat");
        std::fs::write(&path, FIB_WAT).unwrap();

        let loaded = load_module(&ModuleSource::Path(path)).await.unwrap();
        assert_eq!(loaded.title.as_deref(), Some("WAT Fibonacci"));
    }

    #[tokio::test]
    async fn test_load_module_missing_file() {
        let source = ModuleSource::Path(PathBuf::from("/nonexistent/fibonacci.wasm"));
        let err = load_module(&source).await.unwrap_err();
        assert!(matches!(err, BenchError::SuiteLoad { .. }));
    }

    #[cfg(not(feature = "fetch"))]
    #[tokio::test]
    async fn test_url_requires_fetch_feature() {
        let source = ModuleSource::parse("http://localhost/fibonacci.wasm");
        let err = load_module(&source).await.unwrap_err();
        assert!(err.to_string().contains("fetch"));
    }
}
