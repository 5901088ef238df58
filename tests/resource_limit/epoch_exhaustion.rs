use std::sync::{ Arc, atomic::{ AtomicBool, Ordering }};
use std::thread;
use wasm_minimal_protocol::host::CallOutcome ;
use wasmtime::{ Config, Engine };

#[test]
fn passed_deadline_aborts() {

	let mut config = Config::new();
	config.epoch_interruption( true );
	let engine = Engine::new( &config ).expect( "failed to create engine" );

	let mut plugin = crate::fixtures::plugin( "protocol", &engine, () )
		.with_epoch_limiter(| _ctx, _function, _args | 1 )
		.instantiate()
		.expect( "failed to instantiate plugin" );

	let stop = Arc::new( AtomicBool::new( false ));
	let started = Arc::new( AtomicBool::new( false ));
	let stop_clone = Arc::clone( &stop );
	let started_clone = Arc::clone( &started );
	let engine_clone = engine.clone();
	let handle = thread::spawn( move || {
		while !stop_clone.load( Ordering::Acquire ) {
			engine_clone.increment_epoch();
			started_clone.store( true, Ordering::Release );
			thread::yield_now();
		}
	});
	while !started.load( Ordering::Acquire ) {
		thread::yield_now();
	}

	let result = plugin.call( "spin", &[] );

	stop.store( true, Ordering::Release );
	let _ = handle.join();

	match result {
		Ok( CallOutcome::Aborted( _ )) => {}
		other => panic!( "Expected Aborted, found: {:#?}", other ),
	}
	assert!( plugin.is_poisoned() );

}
