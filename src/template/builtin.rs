//! Templates embedded in the binary

/// (template id, template text)
pub(crate) const TEMPLATES: &[(&str, &str)] = &[
    ("backend/user", include_str!("../../assets/templates/backend/User.cs.tmpl")),
    ("backend/role", include_str!("../../assets/templates/backend/Role.cs.tmpl")),
    ("backend/user-role", include_str!("../../assets/templates/backend/UserRole.cs.tmpl")),
    ("backend/password-hasher-interface", include_str!("../../assets/templates/backend/IPasswordHasher.cs.tmpl")),
    ("backend/password-hasher", include_str!("../../assets/templates/backend/PasswordHasher.cs.tmpl")),
    ("backend/jwt-token-service-interface", include_str!("../../assets/templates/backend/IJwtTokenService.cs.tmpl")),
    ("backend/jwt-token-service", include_str!("../../assets/templates/backend/JwtTokenService.cs.tmpl")),
    ("backend/constants", include_str!("../../assets/templates/backend/Constants.cs.tmpl")),
    ("backend/user-configuration", include_str!("../../assets/templates/backend/UserConfiguration.cs.tmpl")),
    ("backend/role-configuration", include_str!("../../assets/templates/backend/RoleConfiguration.cs.tmpl")),
    ("backend/user-role-configuration", include_str!("../../assets/templates/backend/UserRoleConfiguration.cs.tmpl")),
    ("api/auth-controller", include_str!("../../assets/templates/api/AuthController.cs.tmpl")),
    ("api/users-controller", include_str!("../../assets/templates/api/UsersController.cs.tmpl")),
    ("api/roles-controller", include_str!("../../assets/templates/api/RolesController.cs.tmpl")),
    ("api/login-command", include_str!("../../assets/templates/api/LoginCommand.cs.tmpl")),
    ("api/role-dto", include_str!("../../assets/templates/api/RoleDto.cs.tmpl")),
    ("api/user-dto", include_str!("../../assets/templates/api/UserDto.cs.tmpl")),
    ("api/get-users-query", include_str!("../../assets/templates/api/GetUsersQuery.cs.tmpl")),
    ("api/get-user-by-id-query", include_str!("../../assets/templates/api/GetUserByIdQuery.cs.tmpl")),
    ("api/create-user-command", include_str!("../../assets/templates/api/CreateUserCommand.cs.tmpl")),
    ("api/update-user-command", include_str!("../../assets/templates/api/UpdateUserCommand.cs.tmpl")),
    ("api/delete-user-command", include_str!("../../assets/templates/api/DeleteUserCommand.cs.tmpl")),
    ("api/add-role-to-user-command", include_str!("../../assets/templates/api/AddRoleToUserCommand.cs.tmpl")),
    ("api/remove-role-from-user-command", include_str!("../../assets/templates/api/RemoveRoleFromUserCommand.cs.tmpl")),
    ("api/get-roles-query", include_str!("../../assets/templates/api/GetRolesQuery.cs.tmpl")),
    ("api/get-role-by-id-query", include_str!("../../assets/templates/api/GetRoleByIdQuery.cs.tmpl")),
    ("api/create-role-command", include_str!("../../assets/templates/api/CreateRoleCommand.cs.tmpl")),
    ("api/update-role-command", include_str!("../../assets/templates/api/UpdateRoleCommand.cs.tmpl")),
    ("api/delete-role-command", include_str!("../../assets/templates/api/DeleteRoleCommand.cs.tmpl")),
];
