use itertools::Itertools ;
use pipe_trait::Pipe ;
use thiserror::Error ;
use wasmtime::{ ExternType, FuncType, ImportType, Module, ValType };

use crate::abi::{ IMPORT_MODULE, MEMORY_EXPORT, SEND_RESULT_TO_HOST, WRITE_ARGS_TO_BUFFER };



/// Errors that can occur when loading a plugin module.
#[derive( Error, Debug )]
pub enum LoadError {
	/// The bytes are not a valid WebAssembly module (or WAT text).
	#[error( "Compile Error: {0}" )] Compile( wasmtime::Error ),
	/// The module imports something the host doesn't provide, such as unstubbed WASI functions.
	#[error( "Unsupported Import: {module}::{name}" )] UnsupportedImport { module: String, name: String },
	/// A protocol import is declared with the wrong type.
	#[error( "Invalid Import Signature: {name} should be {expected}, found {found}" )]
	InvalidImportSignature { name: String, expected: String, found: String },
	/// The module doesn't export its linear memory as `memory`.
	#[error( "Missing Memory: plugins must export their linear memory as `{MEMORY_EXPORT}`" )] MissingMemory,
}

/// Checks that `module` can be driven through the protocol.
pub(crate) fn validate_module( module: &Module ) -> Result<(), LoadError> {

	module.imports().try_for_each(| import | validate_import( &import ))?;

	[ WRITE_ARGS_TO_BUFFER, SEND_RESULT_TO_HOST ].into_iter()
		.filter(| name | !module.imports().any(| import | import.module() == IMPORT_MODULE && import.name() == *name ))
		.for_each(| name | tracing::debug!( import = name, "plugin does not import protocol primitive" ));

	module.exports()
		.any(| export | export.name() == MEMORY_EXPORT && matches!( export.ty(), ExternType::Memory( _ )))
		.pipe(| exported | match exported {
			true => Ok(()),
			false => Err( LoadError::MissingMemory ),
		})

}

fn validate_import( import: &ImportType<'_> ) -> Result<(), LoadError> {

	let param_count = match ( import.module(), import.name() ) {
		( IMPORT_MODULE, WRITE_ARGS_TO_BUFFER ) => 1,
		( IMPORT_MODULE, SEND_RESULT_TO_HOST ) => 2,
		( module, name ) => return Err( LoadError::UnsupportedImport { module: module.to_string(), name: name.to_string() }),
	};

	match import.ty() {
		ExternType::Func( ty ) if has_shape( &ty, param_count, 0 ) => Ok(()),
		ty => Err( LoadError::InvalidImportSignature {
			name: import.name().to_string(),
			expected: expected_shape( param_count, 0 ),
			found: describe_extern( &ty ),
		}),
	}

}

/// Whether `ty` takes `params` `i32`s and returns `results` `i32`s.
pub(crate) fn has_shape( ty: &FuncType, params: usize, results: usize ) -> bool {
	ty.params().len() == params
		&& ty.results().len() == results
		&& ty.params().chain( ty.results() ).all(| val | matches!( val, ValType::I32 ))
}

/// Whether `ty` is a valid exported entry point: `i32` lengths in, one `i32` status out.
pub(crate) fn is_entry_point( ty: &FuncType ) -> bool {
	has_shape( ty, ty.params().len(), 1 )
}

pub(crate) fn describe_func( ty: &FuncType ) -> String {
	format!( "({}) -> ({})", ty.params().join( ", " ), ty.results().join( ", " ))
}

fn expected_shape( params: usize, results: usize ) -> String {
	format!(
		"({}) -> ({})",
		std::iter::repeat_n( "i32", params ).join( ", " ),
		std::iter::repeat_n( "i32", results ).join( ", " ),
	)
}

fn describe_extern( ty: &ExternType ) -> String {
	match ty {
		ExternType::Func( ty ) => describe_func( ty ),
		ExternType::Global( _ ) => "a global".to_string(),
		ExternType::Table( _ ) => "a table".to_string(),
		ExternType::Memory( _ ) => "a memory".to_string(),
		_ => "a non-function import".to_string(),
	}
}
