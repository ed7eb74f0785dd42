macro_rules! fail {
    ($err:expr) => (
        return Err(From::from($err));
    );
    ($fmt:expr, $($arg:tt)*) => (
        return Err(From::from(format!($fmt, $($arg)*)));
    );
}

macro_rules! ensure {
    ($expr:expr, $err:expr) => (
        if !($expr) {
            fail!($err);
        }
    );
    ($expr: expr, $fmt:expr, $($arg:tt)*) => (
        if !($expr) {
            fail!(format!($fmt, $($arg)*));
        }
    );
}

/// Panics if `$expr` is not an `Err(err)` with `err.to_string()` containing `$err`.
#[cfg(test)]
macro_rules! assert_err {
    ($expr:expr, $err:expr) => {
        match $expr {
            Ok(_) => {
                panic!("assertion failed: not an error in `{}`", stringify!($expr));
            }
            Err(ref value) => {
                let desc = value.to_string();
                if !desc.contains($err) {
                    panic!(
                        "assertion failed: error message {:?} doesn't contain {:?} in `{}`",
                        desc,
                        $err,
                        stringify!($expr)
                    );
                }
            }
        }
    };
}

/// Calls `$func::<T>` with `T` being the Rust type that matches an `ElementKind`.
#[macro_export]
macro_rules! dispatch_element {
    ($kind:expr, $func:ident ( $($arg:expr),* $(,)? )) => {
        match $kind {
            $crate::ElementKind::I8 => $func::<i8>($($arg),*),
            $crate::ElementKind::U8 => $func::<u8>($($arg),*),
            $crate::ElementKind::I16 => $func::<i16>($($arg),*),
            $crate::ElementKind::U16 => $func::<u16>($($arg),*),
            $crate::ElementKind::I32 => $func::<i32>($($arg),*),
            $crate::ElementKind::U32 => $func::<u32>($($arg),*),
            $crate::ElementKind::I64 => $func::<i64>($($arg),*),
            $crate::ElementKind::U64 => $func::<u64>($($arg),*),
            $crate::ElementKind::F32 => $func::<f32>($($arg),*),
            $crate::ElementKind::F64 => $func::<f64>($($arg),*),
        }
    };
}
