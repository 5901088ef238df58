use wasm_minimal_protocol::host::CallOutcome ;

struct TestCtx {
	limiter: MemoryLimiter,
}

struct MemoryLimiter {
	max_bytes: usize,
}

impl wasmtime::ResourceLimiter for MemoryLimiter {
	fn memory_growing( &mut self, _current: usize, desired: usize, _maximum: Option<usize> ) -> wasmtime::Result<bool> {
		Ok( desired <= self.max_bytes )
	}
	fn table_growing( &mut self, _current: usize, _desired: usize, _maximum: Option<usize> ) -> wasmtime::Result<bool> {
		Ok( true )
	}
}

fn double_with_limit( max_pages: usize, input: &[u8] ) -> CallOutcome {

	let ctx = TestCtx { limiter: MemoryLimiter { max_bytes: max_pages * 65536 }};

	let mut plugin = crate::fixtures::plugin( "protocol", &crate::fixtures::ENGINE, ctx )
		.with_memory_limiter(| ctx | &mut ctx.limiter )
		.instantiate()
		.expect( "failed to instantiate plugin" );

	plugin.call( "double_it", &[ input ]).expect( "call should not be rejected" )

}

#[test]
fn denied_growth_fails_without_payload() {
	match double_with_limit( 2, &[ 7; 100_000 ]) {
		CallOutcome::NoPayload { status } => assert_eq!( status.code(), 1 ),
		other => panic!( "Expected NoPayload from denied memory growth, found: {:#?}", other ),
	}
}

#[test]
fn generous_limit_allows_growth() {
	match double_with_limit( 8, &[ 7; 100_000 ]) {
		CallOutcome::Success( payload ) => assert_eq!( payload.len(), 200_000 ),
		other => panic!( "Expected Success within limit, found: {:#?}", other ),
	}
}
