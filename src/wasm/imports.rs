//! Host import surface offered to compiled modules
//!
//! Only the `env` namespace is supported. For every name the module imports
//! we provide:
//!
//! - memories: a fresh linear memory of at least 256 pages
//! - globals (`memoryBase`, `tableBase`, ...): zero-initialised
//! - tables: an empty reference table
//! - `_set_title(ptr)`: reads a NUL-terminated string from memory and keeps
//!   it as the module's title
//!
//! Any other function import is rejected.

use tracing::{debug, warn};
use wasmer::{
    Extern, ExternType, Function, FunctionEnv, FunctionEnvMut, FunctionType, Global, GlobalType,
    Imports, Memory, MemoryType, MemoryView, Module, Mutability, Pages, Store, Table, Type, Value,
};

use super::text::decode_c_string;

pub const IMPORT_NAMESPACE: &str = "env";
pub const DEFAULT_MEMORY_PAGES: u32 = 256;
pub const TITLE_CALLBACKS: [&str; 2] = ["_set_title", "set_title"];

/// State shared with host callbacks
#[derive(Debug, Default)]
pub struct HostEnv {
    pub memory: Option<Memory>,
    pub title: Option<String>,
}

/// Build the import object for exactly the names `module` declares
pub fn build_imports(
    store: &mut Store,
    module: &Module,
    env: &FunctionEnv<HostEnv>,
) -> Result<Imports, String> {
    let mut imports = Imports::new();

    for import in module.imports() {
        if import.module() != IMPORT_NAMESPACE {
            return Err(format!(
                "unsupported import namespace '{}' for '{}'",
                import.module(),
                import.name()
            ));
        }
        let name = import.name();

        let ext: Extern = match import.ty() {
            ExternType::Function(ty) if TITLE_CALLBACKS.contains(&name) => {
                check_title_signature(name, ty)?;
                Function::new_typed_with_env(store, env, set_title).into()
            }
            ExternType::Function(ty) => {
                return Err(format!(
                    "unsupported function import '{}.{}' {}",
                    IMPORT_NAMESPACE, name, ty
                ));
            }
            ExternType::Memory(ty) => {
                let memory = Memory::new(store, host_memory_type(ty))
                    .map_err(|e| format!("cannot create memory '{}': {}", name, e))?;
                env.as_mut(store).memory = Some(memory.clone());
                memory.into()
            }
            ExternType::Global(ty) => zero_global(store, ty)
                .ok_or_else(|| format!("unsupported global type for '{}': {:?}", name, ty.ty))?
                .into(),
            ExternType::Table(ty) => {
                let init = null_ref(ty.ty)
                    .ok_or_else(|| format!("unsupported table element for '{}': {:?}", name, ty.ty))?;
                Table::new(store, *ty, init)
                    .map_err(|e| format!("cannot create table '{}': {}", name, e))?
                    .into()
            }
            ExternType::Tag(_) => {
                return Err(format!("unsupported tag import '{}.{}'", IMPORT_NAMESPACE, name));
            }
        };

        debug!("Providing import {}.{}", IMPORT_NAMESPACE, name);
        imports.define(IMPORT_NAMESPACE, name, ext);
    }

    Ok(imports)
}

fn check_title_signature(name: &str, ty: &FunctionType) -> Result<(), String> {
    if ty.params() == [Type::I32] && ty.results().is_empty() {
        Ok(())
    } else {
        Err(format!("'{}' must have signature [I32] -> [], got {}", name, ty))
    }
}

/// At least [`DEFAULT_MEMORY_PAGES`], capped by the declared maximum
fn host_memory_type(declared: &MemoryType) -> MemoryType {
    let cap = declared.maximum.map_or(u32::MAX, |p| p.0);
    let minimum = declared.minimum.0.max(DEFAULT_MEMORY_PAGES).min(cap);
    MemoryType {
        minimum: Pages(minimum),
        maximum: declared.maximum,
        shared: declared.shared,
    }
}

fn zero_global(store: &mut Store, ty: &GlobalType) -> Option<Global> {
    let value = match ty.ty {
        Type::I32 => Value::I32(0),
        Type::I64 => Value::I64(0),
        Type::F32 => Value::F32(0.0),
        Type::F64 => Value::F64(0.0),
        _ => return None,
    };
    Some(match ty.mutability {
        Mutability::Const => Global::new(store, value),
        Mutability::Var => Global::new_mut(store, value),
    })
}

fn null_ref(ty: Type) -> Option<Value> {
    match ty {
        Type::FuncRef => Some(Value::FuncRef(None)),
        Type::ExternRef => Some(Value::ExternRef(None)),
        _ => None,
    }
}

fn set_title(mut env: FunctionEnvMut<HostEnv>, ptr: i32) {
    let (data, store) = env.data_and_store_mut();

    let title = match data.memory.as_ref() {
        Some(memory) => read_c_string(&memory.view(&store), ptr as u32 as u64),
        None => {
            warn!("Module reported a title but has no linear memory");
            return;
        }
    };

    match title {
        Some(title) => {
            debug!("Module title: {}", title);
            data.title = Some(title);
        }
        None => warn!("Module title pointer {:#x} is out of bounds", ptr),
    }
}

/// Copy bytes out of linear memory up to the first NUL, then decode them
pub fn read_c_string(view: &MemoryView, offset: u64) -> Option<String> {
    let size = view.data_size();
    if offset >= size {
        return None;
    }

    let mut bytes = Vec::new();
    let mut chunk = [0u8; 64];
    let mut pos = offset;
    while pos < size {
        let len = ((size - pos) as usize).min(chunk.len());
        view.read(pos, &mut chunk[..len]).ok()?;
        if let Some(nul) = chunk[..len].iter().position(|&b| b == 0) {
            bytes.extend_from_slice(&chunk[..nul]);
            break;
        }
        bytes.extend_from_slice(&chunk[..len]);
        pos += len as u64;
    }
    decode_c_string(&bytes, 0)
}
