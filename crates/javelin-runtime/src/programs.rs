// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Built-in guest programs, executed the way interpreted bytecode would:
//! every string operation and every line of output goes through the native
//! table and `System.out`.

use crate::Runtime;
use crate::error::{Result, RuntimeError};
use crate::runtime::value::{HeapObject, Value};

const PRINTLN_STRING: &str = "(Ljava/lang/String;)V";

/// Line printed when `main` receives no arguments.
pub const NO_ARGUMENTS: &str = "No arguments were passed.";

/// Header printed before the argument list.
pub const ARGUMENTS_HEADER: &str = "Arguments received:";

/// `PrintArgs.main(String[] args)`: reports the argument list on `System.out`.
pub fn print_args(runtime: &Runtime, args: &Value) -> Result<()> {
    let array = match args.as_object()? {
        Some(obj) => match &**obj {
            HeapObject::Array(array) => array,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "array",
                    found: other.kind(),
                });
            }
        },
        None => return Err(RuntimeError::null_pointer("args")),
    };

    let out = runtime.get_static("java/lang/System", "out", "Ljava/io/PrintStream;")?;
    let println = |line: Value| {
        runtime.invoke_native("java/io/PrintStream", "println", PRINTLN_STRING, &[out.clone(), line])
    };

    if array.length() == 0 {
        println(runtime.new_string(NO_ARGUMENTS))?;
        return Ok(());
    }

    println(runtime.new_string(ARGUMENTS_HEADER))?;
    for index in 0..array.length() {
        let index = i32::try_from(index).map_err(|_| RuntimeError::ArrayIndexOutOfBounds {
            index: i32::MAX,
            length: array.length(),
        })?;
        println(array.read(index)?)?;
    }
    Ok(())
}
