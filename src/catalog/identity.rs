//! The identity feature: user, role and user-role entities, password hashing,
//! JWT issuing, admin seeding and the API surface over them.
//!
//! Patch steps assume the layout every target project shares:
//!
//! ```text
//! src/{P}.Core/I{P}Context.cs
//! src/{P}.Infrastructure/Data/{P}Context.cs
//! src/{P}.Infrastructure/ConfigureServices.cs
//! src/{P}.Infrastructure/Data/SeedData.cs
//! src/{P}.Api/Program.cs
//! ```

use super::Catalog;
use crate::domain::{GenerationStep, PatchStep, Pattern, Position};

const GENERATED: &[(&str, &str)] = &[
    ("backend/user", "src/{{project}}.Core/Model/UserAggregate/User.cs"),
    ("backend/role", "src/{{project}}.Core/Model/UserAggregate/Entities/Role.cs"),
    ("backend/user-role", "src/{{project}}.Core/Model/UserAggregate/Entities/UserRole.cs"),
    ("backend/password-hasher-interface", "src/{{project}}.Core/Services/IPasswordHasher.cs"),
    ("backend/password-hasher", "src/{{project}}.Core/Services/PasswordHasher.cs"),
    ("backend/jwt-token-service-interface", "src/{{project}}.Core/Services/IJwtTokenService.cs"),
    ("backend/jwt-token-service", "src/{{project}}.Core/Services/JwtTokenService.cs"),
    ("backend/constants", "src/{{project}}.Core/Constants.cs"),
    ("backend/user-configuration", "src/{{project}}.Infrastructure/Data/Configurations/UserConfiguration.cs"),
    ("backend/role-configuration", "src/{{project}}.Infrastructure/Data/Configurations/RoleConfiguration.cs"),
    ("backend/user-role-configuration", "src/{{project}}.Infrastructure/Data/Configurations/UserRoleConfiguration.cs"),
    ("api/auth-controller", "src/{{project}}.Api/Controllers/AuthController.cs"),
    ("api/users-controller", "src/{{project}}.Api/Controllers/UsersController.cs"),
    ("api/roles-controller", "src/{{project}}.Api/Controllers/RolesController.cs"),
    ("api/login-command", "src/{{project}}.Api/Features/Auth/LoginCommand.cs"),
    ("api/role-dto", "src/{{project}}.Api/Features/Roles/RoleDto.cs"),
    ("api/user-dto", "src/{{project}}.Api/Features/Users/UserDto.cs"),
    ("api/get-users-query", "src/{{project}}.Api/Features/Users/GetUsersQuery.cs"),
    ("api/get-user-by-id-query", "src/{{project}}.Api/Features/Users/GetUserByIdQuery.cs"),
    ("api/create-user-command", "src/{{project}}.Api/Features/Users/CreateUserCommand.cs"),
    ("api/update-user-command", "src/{{project}}.Api/Features/Users/UpdateUserCommand.cs"),
    ("api/delete-user-command", "src/{{project}}.Api/Features/Users/DeleteUserCommand.cs"),
    ("api/add-role-to-user-command", "src/{{project}}.Api/Features/Users/AddRoleToUserCommand.cs"),
    ("api/remove-role-from-user-command", "src/{{project}}.Api/Features/Users/RemoveRoleFromUserCommand.cs"),
    ("api/get-roles-query", "src/{{project}}.Api/Features/Roles/GetRolesQuery.cs"),
    ("api/get-role-by-id-query", "src/{{project}}.Api/Features/Roles/GetRoleByIdQuery.cs"),
    ("api/create-role-command", "src/{{project}}.Api/Features/Roles/CreateRoleCommand.cs"),
    ("api/update-role-command", "src/{{project}}.Api/Features/Roles/UpdateRoleCommand.cs"),
    ("api/delete-role-command", "src/{{project}}.Api/Features/Roles/DeleteRoleCommand.cs"),
];

const CONTEXT_INTERFACE: &str = "src/{{project}}.Core/I{{project}}Context.cs";
const CONTEXT: &str = "src/{{project}}.Infrastructure/Data/{{project}}Context.cs";
const PROGRAM: &str = "src/{{project}}.Api/Program.cs";
const CONFIGURE_SERVICES: &str = "src/{{project}}.Infrastructure/ConfigureServices.cs";
const SEED_DATA: &str = "src/{{project}}.Infrastructure/Data/SeedData.cs";

/// The last `using` directive before the namespace declaration
const LAST_USING: &str =
    r"(?m)(?P<anchor>^using [^;\r\n]+;[ \t]*\r?\n)(?:[ \t]*\r?\n)*namespace ";

const USER_AGGREGATE_USINGS: &str = "using {{project}}.Core.Model.UserAggregate;
using {{project}}.Core.Model.UserAggregate.Entities;
";

const INTERFACE_DB_SETS: &str = "    /// <summary>
    /// Gets the users.
    /// </summary>
    DbSet<User> Users { get; }

    /// <summary>
    /// Gets the roles.
    /// </summary>
    DbSet<Role> Roles { get; }

    /// <summary>
    /// Gets the user roles.
    /// </summary>
    DbSet<UserRole> UserRoles { get; }

";

const CONTEXT_DB_SETS: &str = "    /// <summary>
    /// Gets or sets the users.
    /// </summary>
    public DbSet<User> Users { get; set; } = null!;

    /// <summary>
    /// Gets or sets the roles.
    /// </summary>
    public DbSet<Role> Roles { get; set; } = null!;

    /// <summary>
    /// Gets or sets the user roles.
    /// </summary>
    public DbSet<UserRole> UserRoles { get; set; } = null!;

";

const QUERY_FILTERS: &str = "        // Apply tenant filter to User
        modelBuilder.Entity<User>().HasQueryFilter(u => u.TenantId == _tenantContext.TenantId);

        // Apply tenant filter to Role
        modelBuilder.Entity<Role>().HasQueryFilter(r => r.TenantId == _tenantContext.TenantId);

";

const PROGRAM_USINGS: &str = "using System.Text;
using Microsoft.AspNetCore.Authentication.JwtBearer;
using Microsoft.IdentityModel.Tokens;
using Microsoft.OpenApi.Models;
";

const JWT_AUTHENTICATION: &str = "

// Configure JWT Authentication
var jwtSettings = builder.Configuration.GetSection(\"Jwt\");
var key = Encoding.UTF8.GetBytes(jwtSettings[\"Key\"] ?? \"YourSuperSecretKeyThatIsAtLeast32CharactersLong!\");

builder.Services.AddAuthentication(options =>
{
    options.DefaultAuthenticateScheme = JwtBearerDefaults.AuthenticationScheme;
    options.DefaultChallengeScheme = JwtBearerDefaults.AuthenticationScheme;
})
.AddJwtBearer(options =>
{
    options.TokenValidationParameters = new TokenValidationParameters
    {
        ValidateIssuer = true,
        ValidateAudience = true,
        ValidateLifetime = true,
        ValidateIssuerSigningKey = true,
        ValidIssuer = jwtSettings[\"Issuer\"] ?? \"{{project}}\",
        ValidAudience = jwtSettings[\"Audience\"] ?? \"{{project}}\",
        IssuerSigningKey = new SymmetricSecurityKey(key),
    };
});

builder.Services.AddAuthorization();";

const SWAGGER_SECURITY: &str = "    // Add JWT security definition
    options.AddSecurityDefinition(\"Bearer\", new OpenApiSecurityScheme
    {
        Description = \"JWT Authorization header using the Bearer scheme. Enter 'Bearer' [space] and then your token.\",
        Name = \"Authorization\",
        In = ParameterLocation.Header,
        Type = SecuritySchemeType.ApiKey,
        Scheme = \"Bearer\",
    });
    options.AddSecurityRequirement(new OpenApiSecurityRequirement
    {
        {
            new OpenApiSecurityScheme
            {
                Reference = new OpenApiReference
                {
                    Type = ReferenceType.SecurityScheme,
                    Id = \"Bearer\",
                },
            },
            Array.Empty<string>()
        },
    });

";

const AUTH_MIDDLEWARE: &str = "app.UseAuthentication();
app.UseAuthorization();

";

const SERVICE_REGISTRATIONS: &str = "        // Register identity services
        services.AddSingleton<IPasswordHasher, PasswordHasher>();
        services.AddSingleton<IJwtTokenService, JwtTokenService>();

";

const SEED_USINGS: &str = "using {{project}}.Core.Model.UserAggregate;
using {{project}}.Core.Model.UserAggregate.Entities;
using {{project}}.Core.Services;
";

const SEED_ROLES_METHOD: &str = "

    private static async Task SeedRolesAndAdminUserAsync(
        {{project}}Context context,
        ILogger logger,
        IPasswordHasher passwordHasher)
    {
        var defaultTenantId = Constants.DefaultTenantId;

        var adminRoleName = \"Admin\";
        var userRoleName = \"User\";

        var adminRole = context.Roles.IgnoreQueryFilters().FirstOrDefault(r => r.Name == adminRoleName);
        if (adminRole == null)
        {
            adminRole = new Role(defaultTenantId, adminRoleName);
            context.Roles.Add(adminRole);
            logger.LogInformation(\"Created Admin role.\");
        }

        var userRole = context.Roles.IgnoreQueryFilters().FirstOrDefault(r => r.Name == userRoleName);
        if (userRole == null)
        {
            userRole = new Role(defaultTenantId, userRoleName);
            context.Roles.Add(userRole);
            logger.LogInformation(\"Created User role.\");
        }

        await context.SaveChangesAsync();

        var adminUserName = \"admin\";
        var adminUser = context.Users.IgnoreQueryFilters().FirstOrDefault(u => u.UserName == adminUserName);
        if (adminUser == null)
        {
            var (hashedPassword, salt) = passwordHasher.HashPassword(\"Admin123!\");
            adminUser = new User(
                tenantId: defaultTenantId,
                userName: adminUserName,
                email: \"admin@{{project_lower}}.local\",
                hashedPassword: hashedPassword,
                salt: salt);

            adminUser.AddRole(adminRole);
            context.Users.Add(adminUser);
            await context.SaveChangesAsync();

            logger.LogInformation(\"Created admin user with Admin role.\");
        }
    }";

/// Anchors on a member declaration, including the `///` doc comment above it
fn before_member(signature: &str) -> Pattern {
    Pattern::regex(format!(
        r"(?m)^(?P<anchor>(?:[ \t]*///[^\n]*\n)*)[ \t]*{}",
        signature
    ))
}

fn step(
    id: &str,
    path: &str,
    anchor: Pattern,
    position: Position,
    insertion: &str,
    predicate: Pattern,
) -> PatchStep {
    PatchStep::new(id, path, anchor, position, insertion, predicate)
}

/// Builds the identity catalog
pub fn identity() -> Catalog {
    let catalog = GENERATED
        .iter()
        .fold(Catalog::new("identity"), |catalog, (template, path)| {
            catalog.generate(GenerationStep::new(*template, *path))
        });

    patches().into_iter().fold(catalog, Catalog::patch)
}

fn patches() -> Vec<PatchStep> {
    use Position::{AfterAnchor, BeforeAnchor};

    vec![
        // I{P}Context
        step(
            "context-interface/usings",
            CONTEXT_INTERFACE,
            Pattern::regex(LAST_USING),
            AfterAnchor,
            USER_AGGREGATE_USINGS,
            Pattern::literal("using {{project}}.Core.Model.UserAggregate;"),
        ),
        step(
            "context-interface/db-sets",
            CONTEXT_INTERFACE,
            before_member(r"Task<int> SaveChangesAsync\("),
            BeforeAnchor,
            INTERFACE_DB_SETS,
            Pattern::literal("DbSet<User> Users"),
        ),
        // {P}Context
        step(
            "context/usings",
            CONTEXT,
            Pattern::regex(LAST_USING),
            AfterAnchor,
            USER_AGGREGATE_USINGS,
            Pattern::literal("using {{project}}.Core.Model.UserAggregate;"),
        ),
        step(
            "context/db-sets",
            CONTEXT,
            before_member(r"protected override void OnModelCreating\("),
            BeforeAnchor,
            CONTEXT_DB_SETS,
            Pattern::literal("public DbSet<User> Users"),
        ),
        step(
            "context/query-filters",
            CONTEXT,
            Pattern::regex(
                r"protected override void OnModelCreating\(ModelBuilder modelBuilder\)\s*\{[^}]*?(?P<anchor>[ \t]*base\.OnModelCreating\(modelBuilder\);)",
            ),
            BeforeAnchor,
            QUERY_FILTERS,
            Pattern::literal("modelBuilder.Entity<User>().HasQueryFilter"),
        ),
        // Program.cs
        step(
            "program/usings",
            PROGRAM,
            Pattern::regex(r"\A(?:[ \t]*(?://[^\r\n]*)?\r?\n)*(?P<anchor>)"),
            BeforeAnchor,
            PROGRAM_USINGS,
            Pattern::literal("using Microsoft.AspNetCore.Authentication.JwtBearer;"),
        ),
        step(
            "program/authentication",
            PROGRAM,
            Pattern::regex(r"builder\.Services\.AddInfrastructureServices\([^)]*\);"),
            AfterAnchor,
            JWT_AUTHENTICATION,
            Pattern::regex(r"AddAuthentication\(|JwtBearerDefaults"),
        ),
        step(
            "program/swagger-security",
            PROGRAM,
            Pattern::regex(
                r"builder\.Services\.AddSwaggerGen\(\s*options\s*=>\s*\{[^}]*?(?P<anchor>[ \t]*options\.SwaggerDoc)",
            ),
            BeforeAnchor,
            SWAGGER_SECURITY,
            Pattern::literal("AddSecurityDefinition(\"Bearer\""),
        ),
        step(
            "program/middleware",
            PROGRAM,
            Pattern::literal("app.UseHttpsRedirection();"),
            BeforeAnchor,
            AUTH_MIDDLEWARE,
            Pattern::literal("app.UseAuthentication();"),
        ),
        // ConfigureServices.cs
        step(
            "configure-services/usings",
            CONFIGURE_SERVICES,
            Pattern::regex(LAST_USING),
            AfterAnchor,
            "using {{project}}.Core.Services;\n",
            Pattern::literal("using {{project}}.Core.Services;"),
        ),
        step(
            "configure-services/registrations",
            CONFIGURE_SERVICES,
            Pattern::regex(r"(?m)^(?P<anchor>)[ \t]*return services;"),
            BeforeAnchor,
            SERVICE_REGISTRATIONS,
            Pattern::regex(r"IPasswordHasher|IJwtTokenService"),
        ),
        // SeedData.cs
        step(
            "seed-data/usings",
            SEED_DATA,
            Pattern::regex(LAST_USING),
            AfterAnchor,
            SEED_USINGS,
            Pattern::literal("using {{project}}.Core.Model.UserAggregate;"),
        ),
        step(
            "seed-data/signature",
            SEED_DATA,
            Pattern::regex(r"SeedAsync\(\w+ context, ILogger logger(?P<anchor>\))"),
            BeforeAnchor,
            ", IPasswordHasher passwordHasher",
            Pattern::regex(r"SeedAsync\([^)]*IPasswordHasher passwordHasher\)"),
        ),
        step(
            "seed-data/null-check",
            SEED_DATA,
            Pattern::literal("ArgumentNullException.ThrowIfNull(logger);"),
            AfterAnchor,
            "\n        ArgumentNullException.ThrowIfNull(passwordHasher);",
            Pattern::literal("ArgumentNullException.ThrowIfNull(passwordHasher);"),
        ),
        step(
            "seed-data/seed-call",
            SEED_DATA,
            Pattern::regex(r"await context\.Database\.(?:EnsureCreated|Migrate)Async\(\);"),
            AfterAnchor,
            "\n\n            await SeedRolesAndAdminUserAsync(context, logger, passwordHasher);",
            Pattern::literal("await SeedRolesAndAdminUserAsync("),
        ),
        step(
            "seed-data/roles-method",
            SEED_DATA,
            // Last closing brace of the class, under either namespace form
            Pattern::regex(
                r"(?s)namespace [\w.]+(?:[ \t]*;.*(?P<anchor>\r?\n\})|\s*\{.*(?P<anchor_block>\r?\n[ \t]+\})[ \t]*\r?\n\})[ \t]*(?:\r?\n)*\z",
            ),
            BeforeAnchor,
            SEED_ROLES_METHOD,
            Pattern::literal("Task SeedRolesAndAdminUserAsync("),
        ),
    ]
}
