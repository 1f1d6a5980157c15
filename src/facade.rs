//! Facade generation for the per-backend surface API.
//!
//! Every backend exposes the same ten operations (five shapes × two
//! concurrency modes), all one-line instantiations of the generic executor.
//! The macro expands that surface at compile time so the repetition lives
//! nowhere in the source.

/// Expand the facade surface for one backend. Invoke with the backend's
/// absolute type path so the expansion resolves inside the nested
/// `blocking` module too.
macro_rules! backend_facade {
    ($backend:ty) => {
        /// Row-set execution returning typed records, one per fetched row,
        /// in fetch order.
        ///
        /// # Errors
        /// Propagates connection, execution, and materialization failures
        /// unchanged.
        pub async fn fetch_rows<T: $crate::FromRow>(
            connection_string: &str,
            sql: &str,
            params: &[$crate::SqlParam],
            kind: $crate::CommandKind,
        ) -> Result<Vec<T>, $crate::SqlConduitError> {
            $crate::executor::fetch_rows::<$backend, T>(connection_string, sql, params, kind).await
        }

        /// Row-set execution with a caller-supplied row mapper.
        ///
        /// # Errors
        /// Propagates connection and execution failures unchanged, plus
        /// whatever the mapper returns.
        pub async fn fetch_rows_with<T, F>(
            connection_string: &str,
            sql: &str,
            params: &[$crate::SqlParam],
            kind: $crate::CommandKind,
            mapper: F,
        ) -> Result<Vec<T>, $crate::SqlConduitError>
        where
            F: FnMut(&$crate::DynamicRow) -> Result<T, $crate::SqlConduitError>,
        {
            $crate::executor::fetch_rows_with::<$backend, T, F>(
                connection_string,
                sql,
                params,
                kind,
                mapper,
            )
            .await
        }

        /// Row-set execution returning dynamic column-bag rows, every column
        /// exposed verbatim in emission order.
        ///
        /// # Errors
        /// Propagates connection and execution failures unchanged.
        pub async fn fetch_dynamic(
            connection_string: &str,
            sql: &str,
            params: &[$crate::SqlParam],
            kind: $crate::CommandKind,
        ) -> Result<Vec<$crate::DynamicRow>, $crate::SqlConduitError> {
            $crate::executor::fetch_dynamic::<$backend>(connection_string, sql, params, kind).await
        }

        /// Scalar execution: first column of the first row, coerced to `T`.
        ///
        /// # Errors
        /// Propagates connection and execution failures unchanged; an
        /// inconvertible value yields a scalar-coercion error.
        pub async fn fetch_scalar<T: $crate::FromSqlValue>(
            connection_string: &str,
            sql: &str,
            params: &[$crate::SqlParam],
            kind: $crate::CommandKind,
        ) -> Result<T, $crate::SqlConduitError> {
            $crate::executor::fetch_scalar::<$backend, T>(connection_string, sql, params, kind)
                .await
        }

        /// Non-query execution returning the backend-reported affected-row
        /// count.
        ///
        /// # Errors
        /// Propagates connection and execution failures unchanged.
        pub async fn execute(
            connection_string: &str,
            sql: &str,
            params: &[$crate::SqlParam],
            kind: $crate::CommandKind,
        ) -> Result<u64, $crate::SqlConduitError> {
            $crate::executor::execute::<$backend>(connection_string, sql, params, kind).await
        }

        /// Blocking mirrors of the five execution shapes, with semantics
        /// identical to the async surface for an identical request. Must not
        /// be called from inside an async context.
        pub mod blocking {
            /// # Errors
            /// Identical to the async variant, plus a connection error when
            /// the runtime cannot be started.
            pub fn fetch_rows<T: $crate::FromRow>(
                connection_string: &str,
                sql: &str,
                params: &[$crate::SqlParam],
                kind: $crate::CommandKind,
            ) -> Result<Vec<T>, $crate::SqlConduitError> {
                $crate::executor::blocking::fetch_rows::<$backend, T>(
                    connection_string,
                    sql,
                    params,
                    kind,
                )
            }

            /// # Errors
            /// Identical to the async variant, plus a connection error when
            /// the runtime cannot be started.
            pub fn fetch_rows_with<T, F>(
                connection_string: &str,
                sql: &str,
                params: &[$crate::SqlParam],
                kind: $crate::CommandKind,
                mapper: F,
            ) -> Result<Vec<T>, $crate::SqlConduitError>
            where
                F: FnMut(&$crate::DynamicRow) -> Result<T, $crate::SqlConduitError>,
            {
                $crate::executor::blocking::fetch_rows_with::<$backend, T, F>(
                    connection_string,
                    sql,
                    params,
                    kind,
                    mapper,
                )
            }

            /// # Errors
            /// Identical to the async variant, plus a connection error when
            /// the runtime cannot be started.
            pub fn fetch_dynamic(
                connection_string: &str,
                sql: &str,
                params: &[$crate::SqlParam],
                kind: $crate::CommandKind,
            ) -> Result<Vec<$crate::DynamicRow>, $crate::SqlConduitError> {
                $crate::executor::blocking::fetch_dynamic::<$backend>(
                    connection_string,
                    sql,
                    params,
                    kind,
                )
            }

            /// # Errors
            /// Identical to the async variant, plus a connection error when
            /// the runtime cannot be started.
            pub fn fetch_scalar<T: $crate::FromSqlValue>(
                connection_string: &str,
                sql: &str,
                params: &[$crate::SqlParam],
                kind: $crate::CommandKind,
            ) -> Result<T, $crate::SqlConduitError> {
                $crate::executor::blocking::fetch_scalar::<$backend, T>(
                    connection_string,
                    sql,
                    params,
                    kind,
                )
            }

            /// # Errors
            /// Identical to the async variant, plus a connection error when
            /// the runtime cannot be started.
            pub fn execute(
                connection_string: &str,
                sql: &str,
                params: &[$crate::SqlParam],
                kind: $crate::CommandKind,
            ) -> Result<u64, $crate::SqlConduitError> {
                $crate::executor::blocking::execute::<$backend>(connection_string, sql, params, kind)
            }
        }
    };
}

pub(crate) use backend_facade;
