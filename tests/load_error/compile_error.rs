use wasm_minimal_protocol::host::{ LoadError, Plugin };

#[test]
fn load_error_compile() {
	match Plugin::new( &crate::fixtures::ENGINE, b"\0asm\x01\0\0\0\xFF", () ) {
		Err( LoadError::Compile( _ )) => {}
		other => panic!( "Expected Compile, found: {:#?}", other.map(| _ | "<Plugin>" )),
	}
	assert!( matches!( Plugin::new( &crate::fixtures::ENGINE, "(module", () ), Err( LoadError::Compile( _ ))));
}

#[test]
fn load_error_missing_file() {
	let path = crate::fixtures::path( "does_not_exist" );
	assert!( matches!( Plugin::from_file( &crate::fixtures::ENGINE, path, () ), Err( LoadError::Compile( _ ))));
}
