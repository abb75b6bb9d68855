pub mod compile_time {
    pub mod file_processing {
        /// Maximum header size read for tokenization (10MB)
        /// RESOURCE: Bounds memory held per worker
        pub const MAX_SOURCE_FILE_SIZE: u64 = 10 * 1024 * 1024;
    }

    pub mod lexical {
        /// Characters of token text shown before truncating in previews
        pub const TOKEN_PREVIEW_LENGTH: usize = 32;

        /// Escape character shared by the comment, char, and string pairs
        pub const ESCAPE_CHAR: char = '\\';

        /// Character classes consumed by numeric literals besides alphanumerics
        pub const NUMBER_CONTINUATION_CHARS: &[char] = &['_', '.', '\''];
    }
}
