// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod utils;

mod test_buffer;
mod test_queries;
mod test_truncate;
