mod clock;

pub use clock::{diagnostic_print, thread_cpu_time, ClockError, DIAGNOSTIC_MESSAGE};

use jni::{JNIEnv, JavaVM};
use log::error;

// Java-side consumer:
//
//     package agents;
//
//     public class HRTimer {
//         private native void print();
//         public native long getCurrentNanotime();
//         static { System.loadLibrary("hrtimer"); }
//     }

/// Called by the JVM when the library is loaded via `System.loadLibrary`.
#[no_mangle]
pub extern "system" fn JNI_OnLoad(
    _vm: JavaVM,
    _reserved: *mut std::ffi::c_void,
) -> jni::sys::jint {
    let _ = env_logger::try_init();
    jni::sys::JNI_VERSION_1_6
}

#[export_name = "Java_agents_HRTimer_print"]
pub extern "system" fn hrtimer_print(_env: JNIEnv, _this: jni::sys::jobject) {
    clock::diagnostic_print();
}

#[export_name = "Java_agents_HRTimer_getCurrentNanotime"]
pub extern "system" fn hrtimer_get_current_nanotime(
    env: JNIEnv,
    _this: jni::sys::jobject,
) -> jni::sys::jlong {
    fn inner_func() -> anyhow::Result<jni::sys::jlong> {
        Ok(clock::thread_cpu_time()?)
    }

    match inner_func() {
        Ok(nanos) => nanos,
        Err(e) => {
            error!("Thread CPU-time read failed: {}", e);
            // The JVM discards the return value once an exception is pending
            if let Err(e) =
                env.throw_new("java/lang/UnsupportedOperationException", e.to_string())
            {
                error!("Unable to raise the failure to the caller: {}", e);
            }
            0
        }
    }
}
